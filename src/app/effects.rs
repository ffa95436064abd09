use std::path::PathBuf;

use crate::app::{App, Message, Model, ToastLevel};
use crate::dialog::Dialog;
use crate::persistence::{FileError, FileHandle, SaveOutcome};
use crate::settings::SPELLCHECK;

/// Suggested target for a first save.
const DEFAULT_SAVE_PATH: &str = "./untitled.md";

impl App {
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::SaveFile => {
                let result = self.files.save_file(&model.buffer.text());
                self.finish_save(model, result);
            }
            Message::SavePath(path) => {
                let result = self
                    .files
                    .save_as(FileHandle::new(path.clone()), &model.buffer.text());
                self.finish_save(model, result);
            }
            Message::OpenPath(path) => match self.files.open_file(FileHandle::new(path.clone())) {
                Ok(text) => model.load_document(&text),
                Err(err) => report_file_error(model, "open", &err),
            },
            Message::CloseFile => self.files.close_file(),
            Message::SetSpellcheck(enabled) => {
                if let Err(err) = self.settings.set(SPELLCHECK, *enabled) {
                    tracing::warn!(error = %err, "failed to persist settings");
                    model.show_toast(ToastLevel::Warning, err.to_string());
                }
                // The subscription reports the change back.
                self.poll_settings(model);
            }
            _ => return,
        }
        self.sync_file_info(model);
    }

    fn finish_save(&self, model: &mut Model, result: Result<SaveOutcome, FileError>) {
        match result {
            Ok(SaveOutcome::Saved(_) | SaveOutcome::Downloaded(_)) => {
                model.buffer.mark_clean();
                model.show_toast(ToastLevel::Info, "Saved successfully.");
            }
            Ok(SaveOutcome::NeedsTarget) => {
                let default = self
                    .files
                    .current_file()
                    .map_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH), |h| h.path().to_path_buf());
                model.open_dialog(Dialog::save_file(&default));
            }
            Err(err) => report_file_error(model, "save", &err),
        }
    }

    pub(super) fn open_launch_file(&mut self, model: &mut Model, path: PathBuf) {
        match self.files.handle_launch(FileHandle::new(path)) {
            Ok(text) => model.load_document(&text),
            Err(err) => report_file_error(model, "launch", &err),
        }
    }

    pub(super) fn sync_file_info(&self, model: &mut Model) {
        model.set_file_info(
            self.files.state(),
            self.files.current_file().map(|h| h.path().to_path_buf()),
        );
    }
}

fn report_file_error(model: &mut Model, op: &str, err: &FileError) {
    tracing::warn!(op, error = %err, "file operation failed");
    model.show_toast(ToastLevel::Error, err.to_string());
}
