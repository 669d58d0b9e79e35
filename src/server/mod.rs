//! Server-side API backend and business logic.
//!
//! This module contains the complete backend implementation for the payout service,
//! including API endpoints, business logic, data access, and the background workers that
//! talk to the payment provider and messaging gateway. The backend uses Axum as the web
//! framework and SeaORM for database operations.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Business logic orchestration between controllers and data layer
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Session access and authentication guards
//!
//! # External Systems
//!
//! - **Provider** (`provider/`) - Payment provider gateway (linked accounts, stakeholders, settlements)
//! - **Messaging** (`messaging/`) - Email, SMS, WhatsApp and push delivery gateway
//!
//! # Infrastructure
//!
//! Supporting modules provide application infrastructure:
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, payment provider)
//! - **Startup** (`startup`) - Initialization of database, sessions, and gateways
//! - **Router** (`router`) - Axum route configuration and API documentation
//! - **Scheduler** (`scheduler/`) - Cron jobs for the outbox worker and status sync
//!
//! # Request Flow
//!
//! A typical request flows through these layers:
//!
//! 1. **Router** receives HTTP request and routes to appropriate controller
//! 2. **Middleware** resolves the session user and checks their role
//! 3. **Controller** converts DTOs to params, calls service
//! 4. **Service** executes business logic, calls the provider, queues side effects
//! 5. **Data** queries database, converts entities to domain models
//! 6. **Controller** converts domain model to DTO, returns HTTP response

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod messaging;
pub mod middleware;
pub mod model;
pub mod provider;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
