//! # Repository Module
//!
//! Database repository implementations for Vendinha.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shop session                                                           │
//! │       │                                                                 │
//! │       │  db.collections().replace(Collection::Sales, &sales)            │
//! │       ▼                                                                 │
//! │  CollectionRepository                                                   │
//! │  ├── load(&self, collection)                                            │
//! │  ├── replace(&self, collection, items)                                  │
//! │  └── exists(&self, collection)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`collection::CollectionRepository`] - Whole-collection load and replace

pub mod collection;
