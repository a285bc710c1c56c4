//! The built-in entity types of the federation protocol.
//!
//! One schema table per message type, registered leaf-first so nested
//! references always resolve. Wire names derive from the type names
//! (`StatusMessage` → `status_message`); the registry rejects collisions.

use chrono::{SecondsFormat, Utc};

use crate::error::EntityResult;
use crate::registry::EntityRegistry;
use crate::schema::SchemaBuilder;

/// Builds a registry containing every built-in entity type.
pub fn registry() -> EntityResult<EntityRegistry> {
    let mut registry = EntityRegistry::new();

    // leaf types
    registry.define(
        SchemaBuilder::new("Profile")
            .property("diaspora_handle")
            .optional("first_name")
            .optional("last_name")
            .optional("image_url")
            .optional("image_url_medium")
            .optional("image_url_small")
            .optional("birthday")
            .optional("gender")
            .optional("bio")
            .optional("location")
            .defaulted("searchable", "true")
            .defaulted("nsfw", "false")
            .optional("tag_string"),
    )?;

    registry.define(
        SchemaBuilder::new("Location")
            .property("address")
            .property("lat")
            .property("lng"),
    )?;

    registry.define(
        SchemaBuilder::new("Photo")
            .property("guid")
            .property("diaspora_handle")
            .property("public")
            .generated("created_at", now)
            .property("remote_photo_path")
            .property("remote_photo_name")
            .optional("text")
            .optional("status_message_guid")
            .property("height")
            .property("width"),
    )?;

    registry.define(
        SchemaBuilder::new("Message")
            .property("guid")
            .property("parent_guid")
            .property("parent_author_signature")
            .property("author_signature")
            .property("text")
            .generated("created_at", now)
            .property("diaspora_handle")
            .property("conversation_guid"),
    )?;

    // composite types
    registry.define(
        SchemaBuilder::new("Person")
            .property("guid")
            .property("diaspora_handle")
            .property("url")
            .child("profile", "Profile")
            .property("exported_key"),
    )?;

    registry.define(
        SchemaBuilder::new("StatusMessage")
            .property("raw_message")
            .child_list("photos", "Photo")
            .optional_child("location", "Location")
            .property("guid")
            .property("diaspora_handle")
            .property("public")
            .generated("created_at", now)
            .optional("provider_display_name"),
    )?;

    registry.define(
        SchemaBuilder::new("Conversation")
            .property("guid")
            .property("subject")
            .generated("created_at", now)
            .child_list("messages", "Message")
            .property("diaspora_handle")
            .property("participant_handles"),
    )?;

    // stand-alone types
    registry.define(
        SchemaBuilder::new("AccountDeletion").property("diaspora_handle"),
    )?;

    registry.define(
        SchemaBuilder::new("Comment")
            .property("guid")
            .property("parent_guid")
            .property("parent_author_signature")
            .property("author_signature")
            .property("text")
            .property("diaspora_handle"),
    )?;

    registry.define(
        SchemaBuilder::new("Like")
            .property("positive")
            .property("guid")
            .property("target_type")
            .property("parent_guid")
            .property("parent_author_signature")
            .property("author_signature")
            .property("diaspora_handle"),
    )?;

    registry.define(
        SchemaBuilder::new("Participation")
            .property("guid")
            .property("target_type")
            .property("parent_guid")
            .property("parent_author_signature")
            .property("author_signature")
            .property("diaspora_handle"),
    )?;

    registry.define(
        SchemaBuilder::new("Request")
            .property("sender_handle")
            .property("recipient_handle"),
    )?;

    registry.define(
        SchemaBuilder::new("Reshare")
            .property("root_diaspora_id")
            .property("root_guid")
            .property("guid")
            .property("diaspora_handle")
            .defaulted("public", "true")
            .generated("created_at", now)
            .optional("provider_display_name"),
    )?;

    registry.define(
        SchemaBuilder::new("Retraction")
            .property("post_guid")
            .property("diaspora_handle")
            .property("type"),
    )?;

    registry.define(
        SchemaBuilder::new("SignedRetraction")
            .property("target_guid")
            .property("target_type")
            .property("sender_handle")
            .property("target_author_signature"),
    )?;

    registry.define(
        SchemaBuilder::new("RelayableRetraction")
            .property("parent_author_signature")
            .property("target_guid")
            .property("target_type")
            .property("sender_handle")
            .property("target_author_signature"),
    )?;

    Ok(registry)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
