mod settings;

pub use settings::{Settings, DEVICE_CODE_URL, SERVICE_URL, TOKEN_URL};
