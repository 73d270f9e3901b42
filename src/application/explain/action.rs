//! Action button payloads.
//!
//! Prompts are multi-line free text full of quotes and backticks. They are
//! carried in a `data-prompt` attribute as `base64(encodeURIComponent(p))`,
//! which is attribute-safe without HTML escaping and which the page script
//! reverses with `decodeURIComponent(atob(payload))`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use handlebars::html_escape;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::domain::{Action, ActionDecodeError, Editor};

/// Characters JavaScript's `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Deep link that hands a prompt to the Cursor agent.
pub const CURSOR_PROMPT_LINK: &str = "cursor://anysphere.cursor-deeplink/prompt?text=";

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

pub fn encode_prompt(prompt: &str) -> String {
    STANDARD.encode(encode_uri_component(prompt))
}

pub fn decode_prompt(payload: &str) -> Result<String, ActionDecodeError> {
    let bytes = STANDARD.decode(payload.trim())?;
    let encoded = std::str::from_utf8(&bytes)?;
    Ok(percent_decode_str(encoded).decode_utf8()?.into_owned())
}

pub fn cursor_prompt_link(prompt: &str) -> String {
    format!("{CURSOR_PROMPT_LINK}{}", encode_uri_component(prompt))
}

const CURSOR_ICON: &str = r#"<svg class="action-icon cursor-icon" viewBox="0 0 24 24" fill="currentColor"><path d="M11.9 2 3.1 7.1v9.8l8.8 5.1 8.8-5.1V7.1zm0 2.3 6.6 3.8-6.6 11.5V12L5.3 8.1z"/></svg>"#;

/// Icon shown before an action label. Only editors that take prompts
/// through the Cursor deep link get the Cursor logo.
pub fn action_icon(editor: Editor) -> &'static str {
    if editor.supports_prompt_links() {
        CURSOR_ICON
    } else {
        ""
    }
}

/// One clickable action. The label is escaped; the prompt travels encoded.
pub fn render_action_button(action: &Action, editor: Editor) -> String {
    format!(
        r#"<button type="button" class="action-btn-link" data-prompt="{}" title="{}">{}<span>{}</span></button>"#,
        encode_prompt(&action.prompt),
        html_escape(&action.label),
        action_icon(editor),
        html_escape(&action.label),
    )
}

pub fn render_action_buttons(actions: &[Action], editor: Editor) -> String {
    actions
        .iter()
        .map(|action| render_action_button(action, editor))
        .collect()
}
