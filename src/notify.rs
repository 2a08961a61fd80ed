// Licensed under the Open Software License version 3.0
pub mod bark;
pub mod config;
pub mod event;
