//! Built-in validators for the built-in entity catalog.
//!
//! One rule table per entity type. Only scalar fields carry rules;
//! nested entities are validated with their own tables by the caller.

use crate::rules::Rule;
use crate::validator::Validator;

/// Returns the rule table for a built-in entity type, or `None` for
/// types without one.
pub fn validator_for(entity_type: &str) -> Option<Validator> {
    let handle = || [Rule::NotEmpty, Rule::Email];

    let validator = match entity_type {
        "AccountDeletion" => Validator::new(entity_type).rule("diaspora_handle", handle()),
        "Comment" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("parent_guid", [Rule::Guid])
            .rule("parent_author_signature", [Rule::NotEmpty])
            .rule("author_signature", [Rule::NotEmpty])
            .rule("text", [Rule::NotEmpty, Rule::Length { maximum: 65535 }])
            .rule("diaspora_handle", handle()),
        "Conversation" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("participant_handles", [Rule::HandleCount { maximum: 20 }]),
        "Like" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("parent_guid", [Rule::Guid])
            .rule("parent_author_signature", [Rule::NotEmpty])
            .rule("author_signature", [Rule::NotEmpty])
            .rule("diaspora_handle", handle()),
        "Location" => Validator::new(entity_type)
            .rule("address", [Rule::NotEmpty])
            .rule("lat", [Rule::Numeric])
            .rule("lng", [Rule::Numeric]),
        "Message" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("parent_guid", [Rule::Guid])
            .rule("parent_author_signature", [Rule::NotEmpty])
            .rule("author_signature", [Rule::NotEmpty])
            .rule("diaspora_handle", handle())
            .rule("conversation_guid", [Rule::Guid]),
        "Participation" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("target_type", [Rule::NotEmpty])
            .rule("parent_guid", [Rule::Guid])
            .rule("parent_author_signature", [Rule::NotEmpty])
            .rule("author_signature", [Rule::NotEmpty])
            .rule("diaspora_handle", handle()),
        "Person" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("exported_key", [Rule::RsaKey]),
        "Photo" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("public", [Rule::Boolean])
            .rule("remote_photo_path", [Rule::NotEmpty])
            .rule("remote_photo_name", [Rule::NotEmpty])
            .rule("status_message_guid", [Rule::Guid])
            .rule("height", [Rule::Numeric])
            .rule("width", [Rule::Numeric]),
        "Profile" => Validator::new(entity_type)
            .rule("diaspora_handle", handle())
            .rule(
                "first_name",
                [
                    Rule::Length { maximum: 32 },
                    Rule::NoSemicolon { allow_blank: true },
                ],
            )
            .rule(
                "last_name",
                [
                    Rule::Length { maximum: 32 },
                    Rule::NoSemicolon { allow_blank: true },
                ],
            )
            .rule("tag_string", [Rule::TagCount { maximum: 5 }])
            .rule("birthday", [Rule::Birthday])
            .rule("searchable", [Rule::Boolean])
            .rule("nsfw", [Rule::Boolean]),
        "RelayableRetraction" => Validator::new(entity_type)
            .rule("parent_author_signature", [Rule::NotEmpty])
            .rule("target_guid", [Rule::Guid])
            .rule("target_type", [Rule::NotEmpty])
            .rule("sender_handle", handle())
            .rule("target_author_signature", [Rule::NotEmpty]),
        "Request" => Validator::new(entity_type)
            .rule("sender_handle", handle())
            .rule("recipient_handle", handle()),
        "Reshare" => Validator::new(entity_type)
            .rule("root_diaspora_id", handle())
            .rule("root_guid", [Rule::Guid])
            .rule("guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("public", [Rule::Boolean]),
        "Retraction" => Validator::new(entity_type)
            .rule("post_guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("type", [Rule::NotEmpty]),
        "SignedRetraction" => Validator::new(entity_type)
            .rule("target_guid", [Rule::Guid])
            .rule("target_type", [Rule::NotEmpty])
            .rule("sender_handle", handle())
            .rule("target_author_signature", [Rule::NotEmpty]),
        "StatusMessage" => Validator::new(entity_type)
            .rule("guid", [Rule::Guid])
            .rule("diaspora_handle", handle())
            .rule("public", [Rule::Boolean]),
        _ => return None,
    };
    Some(validator)
}
