// Licensed under the Open Software License version 3.0
pub mod config;
pub mod device;
pub mod scanner;
