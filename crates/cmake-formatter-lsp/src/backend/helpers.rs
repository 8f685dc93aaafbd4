use super::*;

/// Local path for a `file:` URI. Other schemes have no path.
pub(super) fn file_path(uri: &Url) -> Option<PathBuf> {
    if uri.scheme() != "file" {
        return None;
    }
    uri.to_file_path().ok()
}

/// Document targeted by an executeCommand call.
///
/// The first argument is a URI string, or an object with a `uri` field as
/// some clients send a `TextDocumentIdentifier`.
pub(super) fn command_target(arguments: &[Value]) -> Option<PathBuf> {
    let raw = match arguments.first()? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("uri")?.as_str()?,
        _ => return None,
    };
    let uri = Url::parse(raw).ok()?;
    file_path(&uri)
}
