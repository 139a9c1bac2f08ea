//! Presentation components built on the store.

pub mod switcher;

pub use switcher::{
    LanguageSwitcher,
    SWITCHER_LABEL_KEY,
    SwitcherOption,
    SwitcherView,
};
