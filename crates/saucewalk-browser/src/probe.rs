//! JavaScript snippets evaluated in the page to observe DOM state.
//!
//! Selectors are embedded as JSON string literals so quotes inside attribute
//! selectors survive intact.

use serde::Deserialize;

/// Result of [`text_content`]
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct TextProbe {
    pub found: bool,
    pub text: Option<String>,
}

pub const READY_STATE: &str = "document.readyState";

pub const CURRENT_URL: &str = "window.location.href";

/// Selects the element's existing value so typing replaces it
pub const SELECT_INPUT_TEXT: &str = "function() { this.focus(); this.select(); }";

/// Resolves to `true` once the element's box is non-empty, inside the
/// viewport and unchanged across two animation frames
///
/// Scrolls the element towards the centre first. Elements that cannot be
/// scrolled into view, such as a sidebar link still sliding in, keep
/// resolving to `false` until they arrive.
pub const STABLE_BOX: &str = "function() { \
    const box = () => { \
        const r = this.getBoundingClientRect(); \
        return [r.left, r.top, r.width, r.height]; \
    }; \
    this.scrollIntoView({ block: 'center', inline: 'center' }); \
    const first = box(); \
    return new Promise(resolve => { \
        setTimeout(() => resolve(false), 1000); \
        requestAnimationFrame(() => requestAnimationFrame(() => { \
            const [left, top, width, height] = box(); \
            const moved = [left, top, width, height].some((v, i) => v !== first[i]); \
            const inside = left + width > 0 && top + height > 0 \
                && left < window.innerWidth && top < window.innerHeight; \
            resolve(width > 0 && height > 0 && inside && !moved); \
        })); \
    }); \
}";

/// Whether a click at the centre of the element's box lands on the element
/// itself or one of its descendants
pub const HIT_TEST: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const hit = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2); \
    return hit !== null && (hit === this || this.contains(hit)); \
}";

/// `textContent` of the first element matching `selector`
pub fn text_content(selector: &str) -> serde_json::Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        "(() => {{ \
            const el = document.querySelector({selector}); \
            return {{ found: el !== null, text: el === null ? null : el.textContent }}; \
        }})()"
    ))
}

/// Whether the first element matching `selector` is rendered with a non-empty box
pub fn is_visible(selector: &str) -> serde_json::Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        "(() => {{ \
            const el = document.querySelector({selector}); \
            if (el === null) return false; \
            const rect = el.getBoundingClientRect(); \
            return rect.width > 0 && rect.height > 0 \
                && window.getComputedStyle(el).visibility !== 'hidden'; \
        }})()"
    ))
}
