//! Shared test utilities for pugh-store unit tests.
