//! Saving and restoring instruction scripts. A script is stored as a JSON array of
//! [Instruction]s; nothing else about a [Genotype](crate::genome::Genotype) is persisted.

use crate::{
    error::{ExportError, ImportError},
    genome::Instruction,
};
use std::{fs, io, path::Path};

pub fn export_instructions(instructions: &[Instruction]) -> Result<String, serde_json::Error> {
    serde_json::to_string(instructions)
}

/// Parse and check a saved script. Hold fractions are rejected, not clamped, when they fall out
/// of range.
pub fn import_instructions(blob: &str) -> Result<Vec<Instruction>, ImportError> {
    let instructions = serde_json::from_str::<Vec<Instruction>>(blob)?;
    if instructions.is_empty() {
        return Err(ImportError::Empty);
    }

    if let Some((index, bad)) = instructions
        .iter()
        .enumerate()
        .find(|(_, instruction)| !instruction.is_valid())
    {
        return Err(ImportError::OutOfRange {
            index,
            hold_fraction: bad.hold_fraction,
        });
    }

    Ok(instructions)
}

pub fn save<P: AsRef<Path>>(path: P, instructions: &[Instruction]) -> Result<(), ExportError> {
    fs::write(path, export_instructions(instructions)?)?;
    Ok(())
}

/// Load a saved script. A missing file is not an error, it means nothing has been saved yet.
pub fn load_saved<P: AsRef<Path>>(path: P) -> Result<Option<Vec<Instruction>>, ImportError> {
    match fs::read_to_string(path) {
        Ok(blob) => import_instructions(&blob).map(Some),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// [load_saved], with every failure logged and treated as if nothing had been saved
pub fn load_saved_or_none<P: AsRef<Path>>(path: P) -> Option<Vec<Instruction>> {
    let path = path.as_ref();
    load_saved(path).unwrap_or_else(|err| {
        tracing::warn!(%err, path = %path.display(), "ignoring saved genome");
        None
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::genome::{Direction, Genotype};
    use rand::{rngs::StdRng, SeedableRng};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hopper-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_export_import() {
        let genotype = Genotype::random(25, &mut StdRng::seed_from_u64(6));
        let blob = export_instructions(genotype.instructions()).unwrap();
        assert_eq!(genotype.instructions(), import_instructions(&blob).unwrap());
    }

    #[test]
    fn test_import_rejects() {
        assert!(matches!(import_instructions("[]"), Err(ImportError::Empty)));
        assert!(matches!(
            import_instructions("{\"oops\": 1"),
            Err(ImportError::Corrupt(_))
        ));

        let blob = r#"[
            {"wants_jump": false, "hold_fraction": 0.5, "x_direction": "Right"},
            {"wants_jump": true, "hold_fraction": 1.7, "x_direction": "Left"}
        ]"#;
        assert!(matches!(
            import_instructions(blob),
            Err(ImportError::OutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch("saved");
        let script = vec![
            Instruction::new(true, 0.25, Direction::Right),
            Instruction::new(false, 1., Direction::Stay),
        ];
        save(&path, &script).unwrap();
        let loaded = load_saved(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(Some(script), loaded);
    }

    #[test]
    fn test_hold_fractions_survive_exactly() {
        let script = vec![
            Instruction::new(false, 0.19760227876153202, Direction::Right),
            Instruction::new(true, 0.23591404209460698, Direction::Left),
        ];
        let blob = export_instructions(&script).unwrap();
        let restored = import_instructions(&blob).unwrap();
        for (saved, loaded) in script.iter().zip(&restored) {
            assert_eq!(saved.hold_fraction.to_bits(), loaded.hold_fraction.to_bits());
        }
    }

    #[test]
    fn test_save_into_missing_directory_is_export_error() {
        let path = std::env::temp_dir()
            .join(format!("hopper-no-such-dir-{}", std::process::id()))
            .join("saved.json");
        let script = vec![Instruction::new(false, 0.5, Direction::Stay)];
        assert!(matches!(save(&path, &script), Err(ExportError::Io(_))));
    }

    #[test]
    fn test_missing_is_none() {
        let path = scratch("never-saved");
        assert!(load_saved(&path).unwrap().is_none());
        assert!(load_saved_or_none(&path).is_none());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let path = scratch("corrupt");
        fs::write(&path, "not a genome").unwrap();
        assert!(matches!(load_saved(&path), Err(ImportError::Corrupt(_))));
        assert!(load_saved_or_none(&path).is_none());
        fs::remove_file(&path).unwrap();
    }
}
