//! Embedded payment channel.
//!
//! The hosted checkout page reports its result through three overlapping
//! paths: navigations the host intercepts, messages from the injected script
//! (which itself watches link clicks, `window.open`, DOM markers and a
//! polling fallback), and the user's back button. This module turns each raw
//! signal into at most one [`Classification`](crate::events::Classification).
//!
//! Classification is pure and may report the same result more than once when
//! paths race; deduplication happens in the outcome router.

pub mod back;
pub mod classify;
pub mod navigation;
pub mod script;

pub use back::{
    BackPress, CANCEL_PROMPT, CancelDecision, RouterUnavailable, confirm_cancel, on_back_press,
};
pub use classify::{SchemeMatch, SignalError, classify, classify_message, match_scheme};
pub use navigation::{NavigationAction, NavigationDecision, NavigationOrigin, decide_navigation};
pub use script::injected_script;
