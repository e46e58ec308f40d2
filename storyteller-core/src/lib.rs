//! Storyteller Core
//!
//! Core types shared by the Storyteller client and studio layers.
//!
//! This crate contains:
//! - Domain types: render jobs, scripts, projects and voiceovers
//! - DTOs: request bodies sent to the backend API

pub mod domain;
pub mod dto;
