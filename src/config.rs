// Licensed under the Open Software License version 3.0
pub mod env;
pub mod error;
pub mod file;
pub mod types;
