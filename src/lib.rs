//! ecsh: interactive exec sessions into ECS containers via SSM
//!
//! Discovers clusters, services, tasks, and containers, then opens an
//! interactive session into a chosen container by handing the
//! ecs:ExecuteCommand session tokens to the session-manager-plugin binary.

pub mod aws;
pub mod config;
pub mod discovery;
pub mod select;
pub mod session;
