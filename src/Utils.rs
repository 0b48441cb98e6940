//! different utility modules used throughout the project
/// render settings: image size, sampling, fonts, output format and logging, loaded from TOML
pub mod config;
/// form documents: `graph` sections of key-value pairs turned into graph tasks and back
pub mod form;
/// tiny module to set up logging and save images and sampled curves into files
pub mod logger;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into sections
pub mod task_parser;
///
mod task_parser_tests;
