use web_sys as web;

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("start-overlay") {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Replace the start overlay's status line (loading / errors).
pub fn set_status(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("overlay-status") {
        el.set_text_content(Some(text));
    }
}

#[inline]
pub fn hint_hidden(document: &web::Document) -> bool {
    document
        .get_element_by_id("hint-overlay")
        .and_then(|el| el.get_attribute("style"))
        .map(|s| s.contains("display:none"))
        .unwrap_or(false)
}

pub fn toggle_hint(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("hint-overlay") {
        let style = if hint_hidden(document) { "" } else { "display:none" };
        _ = el.set_attribute("style", style);
    }
}

/// Update the hint overlay with the current visual state
pub fn update_hint(
    document: &web::Document,
    preset: &str,
    bloom: f32,
    fov: f32,
    fps: Option<f32>,
    paused: bool,
) {
    if let Some(el) = document.get_element_by_id("hint-overlay") {
        let fps_text = fps
            .map(|f| format!("{:.0} fps", f))
            .unwrap_or_else(|| "-- fps".to_string());
        let state_text = if paused { " • paused" } else { "" };
        let hint_html = format!(
            "<div style='color: #cfe7ff; font: 13px system-ui; background: rgba(10, 14, 24, 0.8); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(80, 110, 150, 0.35);'>{} • bloom {:.2} • fov {:.1}° • {}{}</div>",
            preset, bloom, fov, fps_text, state_text
        );
        el.set_inner_html(&hint_html);
    }
}
