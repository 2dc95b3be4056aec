// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand implementations. Each writes its report to `out`.

use anyhow::{Context, Result};
use floofy_dialogue::{ChoiceManager, DialogueManager, WriteOptions, FORMAT_VERSION};
use std::io::Write;
use std::path::Path;

fn load(file: &Path) -> Result<DialogueManager> {
    DialogueManager::read_from_file(file).with_context(|| format!("Failed to load dialogue file {}", file.display()))
}

/// Print per-dialogue counts
pub fn info(file: &Path, out: &mut impl Write) -> Result<()> {
    let manager = load(file)?;
    writeln!(out, "{}: {} dialogues", file.display(), manager.num_dialogues())?;
    for dialogue in manager.dialogues() {
        let unassigned = dialogue.choices().filter(|c| !c.guid_assigned()).count();
        writeln!(
            out,
            "  {}: {} participants, {} entries, {} choices ({} without GUID)",
            dialogue.name(),
            dialogue.num_participants(),
            dialogue.num_entries(),
            dialogue.num_choices(),
            unassigned
        )?;
    }
    Ok(())
}

/// Validate a file; the error carries the reason
pub fn check(file: &Path, out: &mut impl Write) -> Result<()> {
    let manager = load(file)?;
    writeln!(out, "{}: ok ({} dialogues)", file.display(), manager.num_dialogues())?;
    Ok(())
}

/// Rewrite a file in the current format version
pub fn upgrade(file: &Path, output: Option<&Path>, pretty: bool, out: &mut impl Write) -> Result<()> {
    let manager = load(file)?;
    let target = output.unwrap_or(file);
    manager
        .write_to_file_with(target, &WriteOptions { pretty })
        .with_context(|| format!("Failed to write {}", target.display()))?;
    writeln!(out, "{} -> {} (version {})", file.display(), target.display(), FORMAT_VERSION)?;
    Ok(())
}

/// List the records of a choice file
pub fn choices(file: &Path, out: &mut impl Write) -> Result<()> {
    let manager = ChoiceManager::read_from_file(file)
        .with_context(|| format!("Failed to load choice file {}", file.display()))?;
    writeln!(out, "{}: {} choices", file.display(), manager.num_choices())?;
    for choice in manager.choices() {
        writeln!(out, "  {:>4}  {}", choice.id().value(), choice.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floofy_dialogue::Reaction;

    const LEGACY: &str = r#"{
        "version": 0,
        "dialogues": [{
            "name": "Gate",
            "participants": [{"id": 1, "name": "Guard"}],
            "entries": [{"id": 1, "entry": "Halt!", "activeParticipant": 1}],
            "choices": [{"id": 1, "choice": "Run", "src": 1, "dst": -1}]
        }]
    }"#;

    fn render(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_info_lists_dialogues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.json");
        std::fs::write(&path, LEGACY).unwrap();

        let report = render(|out| info(&path, out));
        assert!(report.contains("1 dialogues"));
        assert!(report.contains("Gate: 1 participants, 1 entries, 1 choices (1 without GUID)"));
    }

    #[test]
    fn test_check_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"version": 9, "dialogues": []}"#).unwrap();

        let error = check(&path, &mut Vec::new()).unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }

    #[test]
    fn test_upgrade_writes_current_version() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("gate.json");
        let output = dir.path().join("gate.v2.json");
        std::fs::write(&input, LEGACY).unwrap();

        render(|out| upgrade(&input, Some(&output), true, out));

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("\"version\": 2"));
        let upgraded = DialogueManager::read_from_file(&output).unwrap();
        let dialogue = upgraded.dialogue("Gate").unwrap();
        let entry = dialogue.entry_at(0).unwrap();
        assert_eq!(entry.left_reaction, Reaction::None);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), LEGACY);
    }

    #[test]
    fn test_choices_lists_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("choices.json");
        std::fs::write(&path, r#"{"version":1,"choices":[{"id":3,"name":"Take the gold"}]}"#).unwrap();

        let report = render(|out| choices(&path, out));
        assert!(report.contains("1 choices"));
        assert!(report.contains("   3  Take the gold"));
    }
}
