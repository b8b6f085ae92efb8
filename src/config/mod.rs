//! Configuration module for prepify

mod settings;

pub use settings::{
    GeneralSettings, LlmSettings, ResumeSettings, SessionSettings, Settings,
};
