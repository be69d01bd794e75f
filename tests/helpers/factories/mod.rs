pub mod page_factory;
pub mod schema_factory;
pub mod scripted_client;

pub use page_factory::PageFactory;
pub use schema_factory::SchemaFactory;
pub use scripted_client::ScriptedClient;

#[cfg(test)]
mod page_factory_test;
