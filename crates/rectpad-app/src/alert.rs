//! Blocking user alerts.

/// Show a modal alert and wait for the user to dismiss it.
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub fn show_alert(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Rectpad")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Show a modal alert and wait for the user to dismiss it.
#[cfg(target_arch = "wasm32")]
pub fn show_alert(message: &str) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window for alert: {message}");
        return;
    };
    if let Err(e) = window.alert_with_message(message) {
        log::warn!("Alert failed: {:?}", e);
    }
}

/// Headless builds only log the alert.
#[cfg(all(not(feature = "native"), not(target_arch = "wasm32")))]
pub fn show_alert(message: &str) {
    log::warn!("{message}");
}
