//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod client;
pub mod measurements;
pub mod product;
pub mod quote_request;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use measurements::{
    Column as MeasurementsColumn, Entity as Measurements, Model as MeasurementsModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use quote_request::{
    Column as QuoteRequestColumn, Entity as QuoteRequest, Model as QuoteRequestModel, QuoteStatus,
    QuoteType,
};
