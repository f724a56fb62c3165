pub mod customer;

use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use snowflake::SnowflakeIdGenerator;
use thiserror::Error;

pub trait Id:
    Copy
    + Eq
    + Ord
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + FromStr
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner;
}

pub trait Entity: Debug + Clone {
    type Id: Id;

    const ENTITY_NAME: &'static str;

    fn id(&self) -> Self::Id;
}

type BoxedError = Box<dyn Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Database connection error: {0}")]
    ConnectionError(BoxedError),
    #[error("Database query error: {0}")]
    QueryError(BoxedError),
    #[error("Data read error: {0}")]
    ReadError(BoxedError),
    #[error("Data write error: {0}")]
    WriteError(BoxedError),
    #[error("Client side error: {0}")]
    ClientSideError(BoxedError),
}

pub struct IdGenerator(SnowflakeIdGenerator);

impl IdGenerator {
    pub fn new(gen: SnowflakeIdGenerator) -> Self {
        Self(gen)
    }

    pub fn generate<T>(&mut self) -> T
    where
        T: From<u64>,
    {
        T::from(self.0.generate() as u64)
    }
}

impl From<SnowflakeIdGenerator> for IdGenerator {
    fn from(value: SnowflakeIdGenerator) -> Self {
        Self::new(value)
    }
}
