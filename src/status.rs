use web_sys::HtmlElement;

use crate::api::ClientError;
use crate::protocol::Outcome;

pub const WIN_BANNER: &str = "You win!";
pub const LOSS_BANNER: &str = "You lose!";

pub fn banner(outcome: Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Running => None,
        Outcome::Won => Some(WIN_BANNER),
        Outcome::Lost => Some(LOSS_BANNER),
    }
}

// --- DOM ---

pub fn show(overlay: &HtmlElement, header: &HtmlElement, text: &str) -> Result<(), ClientError> {
    header.set_inner_text(text);
    overlay.style().set_property("display", "block")?;
    Ok(())
}

pub fn hide(overlay: &HtmlElement) -> Result<(), ClientError> {
    overlay.style().set_property("display", "none")?;
    Ok(())
}
