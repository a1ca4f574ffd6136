//! Subject -> group roster -> per-group content, as used by the teacher's
//! journal and performance widgets.

use std::collections::HashMap;

use contracts::domain::academic::{StudentGroup, Subject};

use super::generation::{Generation, GenerationCounter};
use super::roster::{InfiniteRoster, RosterItem};
use crate::shared::error::DashboardResult;
use crate::shared::list_utils::Searchable;

impl Searchable for StudentGroup {
    fn matches_filter(&self, filter_lower: &str) -> bool {
        self.name.to_lowercase().contains(filter_lower)
    }
}

impl RosterItem for StudentGroup {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Subject to select on load: the only one, when there is exactly one.
pub fn auto_subject(subjects: &[Subject]) -> Option<i64> {
    match subjects {
        [only] => Some(only.id),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupsState {
    /// No subject selected.
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupContent<T> {
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRoster<T> {
    subject: Option<i64>,
    groups_state: GroupsState,
    groups_counter: GenerationCounter,
    pub groups: InfiniteRoster<StudentGroup>,
    contents: HashMap<i64, (Generation, GroupContent<T>)>,
    content_counter: GenerationCounter,
}

impl<T> SubjectRoster<T> {
    pub fn new(batch_size: usize) -> Self {
        Self {
            subject: None,
            groups_state: GroupsState::Idle,
            groups_counter: GenerationCounter::default(),
            groups: InfiniteRoster::new(batch_size),
            contents: HashMap::new(),
            content_counter: GenerationCounter::default(),
        }
    }

    /// Resets the roster. Returns the generation of the group load to start.
    pub fn select_subject(&mut self, subject: Option<i64>) -> Option<Generation> {
        self.subject = subject;
        self.groups.clear();
        self.contents.clear();
        match subject {
            Some(_) => {
                self.groups_state = GroupsState::Loading;
                Some(self.groups_counter.next())
            }
            None => {
                self.groups_counter.invalidate();
                self.groups_state = GroupsState::Idle;
                None
            }
        }
    }

    pub fn subject(&self) -> Option<i64> {
        self.subject
    }

    pub fn groups_state(&self) -> &GroupsState {
        &self.groups_state
    }

    /// Applies the group list. Returns the keys of the first rendered batch,
    /// whose content should be preloaded.
    pub fn finish_groups(&mut self, generation: Generation, result: DashboardResult<Vec<StudentGroup>>) -> Vec<i64> {
        if !self.groups_counter.is_current(generation) {
            log::debug!("dropping stale group roster {:?}", generation);
            return Vec::new();
        }
        match result {
            Ok(groups) => {
                self.groups.set_items(groups);
                self.groups_state = GroupsState::Ready;
                self.missing_content()
            }
            Err(e) => {
                self.groups_state = GroupsState::Failed(e.to_string());
                Vec::new()
            }
        }
    }

    /// Rendered groups whose content was never requested.
    pub fn missing_content(&self) -> Vec<i64> {
        self.groups
            .visible()
            .into_iter()
            .map(|g| g.id)
            .filter(|id| !self.contents.contains_key(id))
            .collect()
    }

    /// Marks a group's content as loading. `None` without a subject.
    pub fn begin_content(&mut self, group_id: i64) -> Option<(i64, Generation)> {
        let subject = self.subject?;
        let generation = self.content_counter.next();
        self.contents.insert(group_id, (generation, GroupContent::Loading));
        Some((subject, generation))
    }

    /// Stores a group's content unless the subject changed or a reload
    /// superseded the request.
    pub fn finish_content(&mut self, group_id: i64, generation: Generation, result: DashboardResult<T>) -> bool {
        match self.contents.get_mut(&group_id) {
            Some((issued, content)) if *issued == generation => {
                *content = match result {
                    Ok(value) => GroupContent::Ready(value),
                    Err(e) => GroupContent::Failed(e.to_string()),
                };
                true
            }
            _ => {
                log::debug!("dropping stale content for group {}", group_id);
                false
            }
        }
    }

    /// Phase of a group's content plus the request it came from. Views key
    /// their re-render on it, so edits inside loaded content do not rebuild
    /// the whole group.
    pub fn content_stamp(&self, group_id: i64) -> Option<(Generation, GroupContent<()>)> {
        self.contents.get(&group_id).map(|(generation, content)| {
            let phase = match content {
                GroupContent::Loading => GroupContent::Loading,
                GroupContent::Ready(_) => GroupContent::Ready(()),
                GroupContent::Failed(message) => GroupContent::Failed(message.clone()),
            };
            (*generation, phase)
        })
    }

    pub fn content(&self, group_id: i64) -> Option<&GroupContent<T>> {
        self.contents.get(&group_id).map(|(_, c)| c)
    }

    pub fn content_mut(&mut self, group_id: i64) -> Option<&mut T> {
        match self.contents.get_mut(&group_id) {
            Some((_, GroupContent::Ready(value))) => Some(value),
            _ => None,
        }
    }

    /// Search change; returns groups that became visible without content.
    pub fn set_search(&mut self, term: &str) -> Vec<i64> {
        self.groups.set_search(term);
        self.missing_content()
    }

    /// `None` when the scroll appended nothing; otherwise the appended
    /// groups whose content still has to be requested.
    pub fn on_scroll(
        &mut self,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
        threshold: f64,
    ) -> Option<Vec<i64>> {
        let appended = self.groups.on_scroll(scroll_top, client_height, scroll_height, threshold);
        if appended.is_empty() {
            return None;
        }
        Some(
            appended
                .into_iter()
                .filter(|id| !self.contents.contains_key(id))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::DashboardError;

    fn group(id: i64, name: &str) -> StudentGroup {
        StudentGroup {
            id,
            name: name.to_string(),
            student_count: 20,
        }
    }

    fn subject(id: i64) -> Subject {
        Subject {
            id,
            name: format!("Предмет {}", id),
        }
    }

    #[test]
    fn test_single_subject_is_auto_selected() {
        assert_eq!(auto_subject(&[subject(4)]), Some(4));
        assert_eq!(auto_subject(&[subject(4), subject(5)]), None);
        assert_eq!(auto_subject(&[]), None);
    }

    #[test]
    fn test_groups_of_previous_subject_are_dropped() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(50);
        let first = roster.select_subject(Some(1)).unwrap();
        let second = roster.select_subject(Some(2)).unwrap();

        let preload = roster.finish_groups(second, Ok(vec![group(7, "ИТ-21"), group(8, "ИТ-22")]));
        assert_eq!(preload, vec![7, 8]);
        assert!(roster.finish_groups(first, Ok(vec![group(1, "ЭК-11")])).is_empty());
        assert_eq!(roster.groups.total(), 2);
    }

    #[test]
    fn test_content_of_old_subject_is_ignored() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(50);
        let g = roster.select_subject(Some(1)).unwrap();
        roster.finish_groups(g, Ok(vec![group(7, "ИТ-21")]));
        let (subject, generation) = roster.begin_content(7).unwrap();
        assert_eq!(subject, 1);

        let g = roster.select_subject(Some(2)).unwrap();
        roster.finish_groups(g, Ok(vec![group(7, "ИТ-21")]));
        assert!(!roster.finish_content(7, generation, Ok(5)));
        assert_eq!(roster.content(7), None);

        let (_, generation) = roster.begin_content(7).unwrap();
        assert!(roster.finish_content(7, generation, Ok(9)));
        assert_eq!(roster.content(7), Some(&GroupContent::Ready(9)));
    }

    #[test]
    fn test_failed_group_list() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(50);
        let g = roster.select_subject(Some(1)).unwrap();
        roster.finish_groups(g, Err(DashboardError::Network("offline".into())));
        assert!(matches!(roster.groups_state(), GroupsState::Failed(_)));

        assert!(roster.select_subject(None).is_none());
        assert_eq!(roster.groups_state(), &GroupsState::Idle);
        assert!(roster.begin_content(7).is_none());
    }

    #[test]
    fn test_scroll_without_new_batch_changes_nothing() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(2);
        let g = roster.select_subject(Some(1)).unwrap();
        roster.finish_groups(g, Ok(vec![group(7, "ИТ-21"), group(8, "ИТ-22"), group(9, "ИТ-23")]));
        let before = roster.clone();

        // далеко от низа
        assert_eq!(roster.on_scroll(0.0, 300.0, 1000.0, 50.0), None);
        assert_eq!(roster, before);

        assert_eq!(roster.on_scroll(660.0, 300.0, 1000.0, 50.0), Some(vec![9]));
        // всё уже отрисовано
        assert_eq!(roster.on_scroll(700.0, 300.0, 1000.0, 50.0), None);
    }

    #[test]
    fn test_next_batch_leaves_rendered_groups_alone() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(2);
        let g = roster.select_subject(Some(1)).unwrap();
        let preload = roster.finish_groups(
            g,
            Ok(vec![group(1, "А-1"), group(2, "А-2"), group(3, "А-3"), group(4, "А-4")]),
        );
        assert_eq!(preload, vec![1, 2]);

        let (_, first) = roster.begin_content(1).unwrap();
        roster.begin_content(2);
        assert!(roster.finish_content(1, first, Ok(10)));
        let stamp = roster.content_stamp(1);
        assert_eq!(stamp, Some((first, GroupContent::Ready(()))));

        // вторая порция приходит, пока группа 2 ещё грузится
        assert_eq!(roster.on_scroll(700.0, 300.0, 1000.0, 50.0), Some(vec![3, 4]));
        assert_eq!(roster.content_stamp(1), stamp);
        assert_eq!(roster.content_stamp(2).map(|(_, c)| c), Some(GroupContent::Loading));
        assert_eq!(roster.content_stamp(3), None);
        assert_eq!(roster.groups.visible().len(), 4);
    }

    #[test]
    fn test_content_stamp_tracks_reloads() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(50);
        let g = roster.select_subject(Some(1)).unwrap();
        roster.finish_groups(g, Ok(vec![group(7, "ИТ-21")]));
        let (_, first) = roster.begin_content(7).unwrap();
        roster.finish_content(7, first, Err(DashboardError::Network("offline".into())));
        assert!(matches!(roster.content_stamp(7), Some((_, GroupContent::Failed(_)))));

        let (_, second) = roster.begin_content(7).unwrap();
        roster.finish_content(7, second, Ok(3));
        assert_eq!(roster.content_stamp(7), Some((second, GroupContent::Ready(()))));
        assert_ne!(first, second);
    }

    #[test]
    fn test_search_reports_groups_without_content() {
        let mut roster: SubjectRoster<u32> = SubjectRoster::new(1);
        let g = roster.select_subject(Some(1)).unwrap();
        assert_eq!(roster.finish_groups(g, Ok(vec![group(7, "ИТ-21"), group(8, "ЭК-22")])), vec![7]);
        roster.begin_content(7);
        assert_eq!(roster.set_search("эк"), vec![8]);
    }
}
