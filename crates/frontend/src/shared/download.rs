//! Сохранение бинарных ответов (PDF-отчёты) через браузер
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::error::{DashboardError, DashboardResult};

fn dom_err(what: &str, e: wasm_bindgen::JsValue) -> DashboardError {
    DashboardError::Network(format!("{}: {:?}", what, e))
}

/// Создает Blob из байтов ответа
fn create_blob(bytes: &[u8], mime: &str) -> DashboardResult<Blob> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| dom_err("Failed to create blob", e))
}

/// Сохраняет PDF под указанным именем
pub fn save_pdf(bytes: &[u8], filename: &str) -> DashboardResult<()> {
    let blob = create_blob(bytes, "application/pdf")?;
    download_blob(&blob, filename)
}

/// Инициирует скачивание Blob через браузер
fn download_blob(blob: &Blob, filename: &str) -> DashboardResult<()> {
    let window = web_sys::window().ok_or_else(|| DashboardError::Network("No window object".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DashboardError::Network("No document object".into()))?;
    let body = document
        .body()
        .ok_or_else(|| DashboardError::Network("No body element".into()))?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| dom_err("Failed to create object URL", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| dom_err("Failed to create anchor", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| dom_err("Failed to cast to anchor", e.into()))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| dom_err("Failed to set style", e))?;

    body.append_child(&anchor)
        .map_err(|e| dom_err("Failed to append anchor", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| dom_err("Failed to remove anchor", e))?;

    Url::revoke_object_url(&url).map_err(|e| dom_err("Failed to revoke URL", e))?;
    log::info!("Saved {}", filename);
    Ok(())
}

/// Загружает PDF-отчёт с сервера и сохраняет его
pub async fn download_report(path: &str, filename: &str) -> DashboardResult<()> {
    let bytes = super::transport::get_bytes(path).await?;
    save_pdf(&bytes, filename)
}
