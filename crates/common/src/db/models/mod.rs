//! Row models for the Sakila schema
//!
//! `country` and `city` are SeaORM entities; the remaining types are
//! `FromQueryResult` rows decoded from hand-written joins and aggregates.

mod actor;
mod city;
mod country;
mod customer;
mod film;
mod rental;

pub use actor::{Actor, ActorRentalCount};

pub use city::{
    Entity as CityEntity,
    Model as City,
    ActiveModel as CityActiveModel,
    Column as CityColumn,
};

pub use country::{
    Entity as CountryEntity,
    Model as Country,
    Column as CountryColumn,
};

pub use customer::{
    AddressRecord, CityRef, CreatedCustomer, CustomerDetail, CustomerRecord, CustomerSummary,
};

pub use film::{FilmActor, FilmDetail, FilmRentalCount, FilmSummary};

pub use rental::{CreatedRental, CustomerRental, RentalHistory, RentalStatus};
