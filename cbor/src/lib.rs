#![no_std]

pub mod decode;
