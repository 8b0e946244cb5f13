use crate::config::SETTINGS_FILE;
use anyhow::Result;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use log::warn;
use std::ffi::OsString;
use std::io;

/// 執行前的確認，預設為否
///
/// ESC 或 Ctrl-C 都視為取消
pub fn confirm_start(prompt: &str) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact_opt();

    match answer {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
            warn!("確認時收到中斷訊號");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// 程式自身產生的檔案，整理時不應被搬動
#[must_use]
pub fn tool_artifact_names() -> Vec<OsString> {
    let mut names = vec![OsString::from(SETTINGS_FILE)];
    if let Some(exe_name) = std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(ToOwned::to_owned))
    {
        names.push(exe_name);
    }
    names
}
