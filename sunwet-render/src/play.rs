//! Play buttons and the view playlist.
//!
//! Each play button resolves its field bundle into a `PlaylistEntry` when it
//! is rendered. The view's playlist is every button's entry in reading
//! order, and a button's index is its position in that list, so playback can
//! move on from one entry to the next.

use sunwet_api::{DataContext, FileRef, PlayButtonSpec, PlaylistEntry, Value};
use sunwet_layout::RenderNode;

use crate::error::RenderError;
use crate::resolve::{lookup, resolve_field_or_literal};

/// Resolve a play button's field bundle against its row.
///
/// The file and media type are required. Descriptive fields that are absent
/// or null come back as `None`.
pub fn playlist_entry(button: &PlayButtonSpec, ctx: &DataContext) -> Result<PlaylistEntry, RenderError> {
    let file = file_ref(lookup(ctx, &button.file_field)?, &button.file_field)?;
    let media_type = match resolve_field_or_literal(ctx, &button.media)? {
        Value::String(s) => s,
        other => {
            return Err(RenderError::type_mismatch(format!(
                "media type is a {}, not a string",
                other.kind_name()
            )));
        }
    };
    let cover = match optional(ctx, &button.cover_field)? {
        Some((field, value)) => Some(file_ref(value, field)?),
        None => None,
    };
    Ok(PlaylistEntry {
        file,
        media_type,
        name: optional_text(ctx, &button.name_field)?,
        album: optional_text(ctx, &button.album_field)?,
        artist: optional_text(ctx, &button.artist_field)?,
        cover,
    })
}

/// Number the tree's play buttons in reading order and collect their entries.
pub fn index_playlist(root: &mut RenderNode) -> Vec<PlaylistEntry> {
    let mut playlist = Vec::new();
    root.visit_reading_mut(&mut |node| {
        if let RenderNode::PlayButton(leaf) = node {
            leaf.index = playlist.len();
            playlist.push(leaf.entry.clone());
        }
    });
    playlist
}

fn file_ref(value: &Value, field: &str) -> Result<FileRef, RenderError> {
    match value {
        Value::File(file) => Ok(file.clone()),
        Value::String(s) => s.parse().map_err(|_| {
            RenderError::type_mismatch(format!("field `{}` is not a file reference", field))
        }),
        other => Err(RenderError::type_mismatch(format!(
            "field `{}` is a {}, not a file reference",
            field,
            other.kind_name()
        ))),
    }
}

fn optional<'a>(ctx: &'a DataContext, field: &'a Option<String>) -> Result<Option<(&'a str, &'a Value)>, RenderError> {
    let Some(field) = field else {
        return Ok(None);
    };
    match lookup(ctx, field) {
        Ok(Value::Null) | Err(RenderError::MissingField(_)) => Ok(None),
        Ok(value) => Ok(Some((field.as_str(), value))),
        Err(e) => Err(e),
    }
}

fn optional_text(ctx: &DataContext, field: &Option<String>) -> Result<Option<String>, RenderError> {
    match optional(ctx, field)? {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((field, value)) if value.is_composite() => Err(RenderError::type_mismatch(format!(
            "field `{}` is a {}, not text",
            field,
            value.kind_name()
        ))),
        Some((_, value)) => Ok(Some(value.to_json_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunwet_api::{Direction, FieldOrLiteral, Orientation, TransAlign};
    use sunwet_layout::{LinearNode, PlayButtonLeaf};

    fn button() -> PlayButtonSpec {
        PlayButtonSpec {
            file_field: "file".into(),
            media: FieldOrLiteral::Literal(Value::from("sunwet/1/audio")),
            name_field: Some("name".into()),
            album_field: Some("album".into()),
            artist_field: None,
            cover_field: Some("cover".into()),
            orientation: Default::default(),
            align: Default::default(),
        }
    }

    fn entry(row: &str) -> Result<PlaylistEntry, RenderError> {
        playlist_entry(&button(), &DataContext::from_json(row).unwrap())
    }

    fn leaf(token: &str) -> RenderNode {
        RenderNode::PlayButton(PlayButtonLeaf {
            entry: entry(&format!(r#"{{"file": "{}"}}"#, token)).unwrap(),
            index: 99,
            orientation: Orientation::default(),
            align: TransAlign::Start,
        })
    }

    #[test]
    fn test_entry_resolves_bundle() {
        let entry = entry(r#"{"file": {"$file": "sha256:aa"}, "name": "Song", "album": null, "cover": "sha256:bb"}"#)
            .unwrap();
        assert_eq!(entry.file.token(), "sha256:aa");
        assert_eq!(entry.media_type, "sunwet/1/audio");
        assert_eq!(entry.name.as_deref(), Some("Song"));
        assert_eq!(entry.album, None);
        assert_eq!(entry.artist, None);
        assert_eq!(entry.cover.map(|c| c.token()), Some("sha256:bb".to_string()));
    }

    #[test]
    fn test_entry_requires_file() {
        let err = entry(r#"{"name": "Song"}"#).unwrap_err();
        assert_eq!(err, RenderError::MissingField("file".into()));

        let err = entry(r#"{"file": 7}"#).unwrap_err();
        assert!(matches!(err, RenderError::TypeMismatch(_)));
    }

    #[test]
    fn test_numeric_name_is_stringified() {
        let entry = entry(r#"{"file": "sha256:aa", "name": 1999}"#).unwrap();
        assert_eq!(entry.name.as_deref(), Some("1999"));
    }

    #[test]
    fn test_index_follows_reading_order() {
        let mut root = RenderNode::Linear(LinearNode::build(
            Direction::Up,
            TransAlign::Start,
            vec![leaf("sha256:01"), leaf("sha256:02"), leaf("sha256:03")],
        ));
        let playlist = index_playlist(&mut root);
        let tokens: Vec<String> = playlist.iter().map(|e| e.file.token()).collect();
        assert_eq!(tokens, vec!["sha256:01", "sha256:02", "sha256:03"]);

        // Screen order is reversed for an upward line; indices are not.
        let RenderNode::Linear(line) = &root else {
            panic!("expected linear");
        };
        let indices: Vec<usize> = line
            .children
            .iter()
            .map(|c| match &c.node {
                RenderNode::PlayButton(p) => p.index,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }
}
