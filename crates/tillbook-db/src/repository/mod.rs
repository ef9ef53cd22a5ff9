//! # Repository Module
//!
//! Database repository implementations for Tillbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Console Screen                                                        │
//! │       │                                                                 │
//! │       │  db.products().list(Some("espresso"), true)                    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, search, active_only)                                  │
//! │  ├── get(&self, id)                                                    │
//! │  ├── create(&self, new)                                                │
//! │  ├── update(&self, id, patch)                                          │
//! │  └── deactivate(&self, id)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and admin mutations
//! - [`sale::SaleRepository`] - Atomic sale recording and history reads

pub mod product;
pub mod sale;
