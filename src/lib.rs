#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]
#![allow(non_snake_case)]

#[macro_use]
extern crate serde_derive;
extern crate serde;
extern crate serde_json;
extern crate serde_yaml;

#[macro_use]
extern crate log;

extern crate regex;
extern crate url;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Io(::std::io::Error);
        Int(::std::num::ParseIntError);
        SerdeY(serde_yaml::Error);
        SerdeJ(serde_json::Error);
        Url(url::ParseError);
    }
    errors {
        ParseError(origin: String, reason: String) {
            description("manifest is not well-formed")
            display("{} is not a well-formed manifest: {}", origin, reason)
        }
        ValidationError(field: String, reason: String) {
            description("manifest does not validate")
            display("invalid {}: {}", field, reason)
        }
        MissingSecrets(keys: Vec<String>) {
            description("operator supplied secrets are missing")
            display("secrets not supplied: {}", keys.join(", "))
        }
        MissingBotToken {
            description("BOT_TOKEN not specified")
            display("BOT_TOKEN (or TELEGRAM_BOT_TOKEN) not specified")
        }
        InvalidBotToken {
            description("bot token is of incorrect form")
            display("bot token must be of the form <id>:<secret>")
        }
    }
}

/// Construct a `ValidationError` for a field path
pub(crate) fn invalid<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Error {
    ErrorKind::ValidationError(field.into(), reason.into()).into()
}

/// Lenient deserializers for scalar values
pub mod deserializers;

/// Structs nested inside a service descriptor
pub mod structs;

pub mod manifest;
pub use crate::manifest::{Blueprint, ServiceDescriptor};

/// Reading and writing blueprints on disk
mod filebacked;
pub use crate::filebacked::{load, parse, render};

/// Environment injected into the running service
pub mod env;
pub use crate::env::{ProcessEnv, SecretStore};

/// Configuration the deployed bot derives from its environment
pub mod botconfig;
pub use crate::botconfig::BotConfig;
