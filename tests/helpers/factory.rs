pub use super::factories::{PageFactory, SchemaFactory, ScriptedClient};

pub struct Factory;

impl Factory {
    pub fn page() -> PageFactory {
        PageFactory::new()
    }

    pub fn schema() -> SchemaFactory {
        SchemaFactory::new()
    }

    pub fn scripted_client() -> ScriptedClient {
        ScriptedClient::new()
    }
}
