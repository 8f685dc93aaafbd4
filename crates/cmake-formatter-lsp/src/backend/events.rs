use super::*;

impl Backend {
    pub(super) async fn handle_did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(path) = helpers::file_path(&uri) else {
            return;
        };
        self.host
            .update_document(uri, path, params.text_document.text)
            .await;
    }

    pub(super) async fn handle_did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(path) = helpers::file_path(&uri) else {
            return;
        };
        // Full sync: the last change carries the whole document
        if let Some(change) = params.content_changes.into_iter().last() {
            self.host.update_document(uri, path, change.text).await;
        }
    }

    pub(super) async fn handle_did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(path) = helpers::file_path(&uri) else {
            return;
        };
        if let Some(text) = params.text {
            self.host.update_document(uri, path.clone(), text).await;
        }

        let action = self.coordinator.on_did_save(&path).await;
        tracing::debug!(path = %path.display(), ?action, "Handled didSave");
    }

    pub(super) async fn handle_did_close(&self, params: DidCloseTextDocumentParams) {
        if let Some(path) = helpers::file_path(&params.text_document.uri) {
            self.host.close_document(&path).await;
        }
    }
}
