pub mod secrets_path;
