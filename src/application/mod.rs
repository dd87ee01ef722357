// Application layer - Resolution, layout and alert synthesis
pub mod alert_synthesizer;
pub mod generator_service;
pub mod layout_engine;
pub mod settings_resolver;
