//! Property-based testing utilities for discograph-core.
//!
//! This module provides strategies for values, layer sets and small
//! annotation graphs to enable property-based testing with proptest.
