pub mod kpi_card;
pub mod ranking_table;
pub mod search_input;
pub mod sortable_header_cell;
pub mod widget_card;

pub use kpi_card::KpiCard;
pub use ranking_table::RankingTableView;
pub use search_input::SearchInput;
pub use sortable_header_cell::SortableHeaderCell;
pub use widget_card::WidgetCard;
