//! Clipboard functionality
//!
//! On X11 and Wayland the clipboard is served by whichever process set it,
//! so a short-lived process has to keep serving its contents for a while or
//! they vanish when it exits.

use arboard::Clipboard;
use std::time::Duration;

/// Get clipboard content
pub fn get_clipboard_content() -> Result<String, String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .get_text()
        .map_err(|e| format!("Failed to read clipboard: {}", e))
}

/// Set clipboard content.
///
/// Blocks on X11 and Wayland until another program takes the clipboard or
/// `hold` elapses; returns right away elsewhere.
pub fn set_clipboard_content(text: &str, hold: Duration) -> Result<(), String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    set_text(&mut clipboard, text, hold).map_err(|e| format!("Failed to write clipboard: {}", e))
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_text(clipboard: &mut Clipboard, text: &str, hold: Duration) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    clipboard
        .set()
        .wait_until(Instant::now() + hold)
        .text(text)
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_text(clipboard: &mut Clipboard, text: &str, _hold: Duration) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}
