pub mod service;

pub use service::{
    BatchEntry, BatchRequest, BatchResponse, Health, ServiceError, ServiceResult, SynergyService,
};
