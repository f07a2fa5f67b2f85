//! Driver commands.
//!
//! Every command writes results to `out` and diagnostics to `err`, and
//! returns whether it succeeded.

use std::io::Write;

use strand_diagnostic::emitter::{render, SourceFile};
use strand_diagnostic::Diagnostic;
use strand_ir::SharedInterner;
use strand_resolve::export::{dependency_records, import_json, render_import, to_json};
use strand_resolve::{ImportError, ModuleId, Session};
use tracing::debug;

use crate::options::{CliError, Command, Options};

/// Run the command named in `options`.
pub fn run(
    options: &Options,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CliError> {
    debug!(command = options.command.name(), file = %options.file.display(), "running");
    match options.command {
        Command::Check => check(options, out, err),
        Command::Deps => deps(options, out, err),
        Command::Imports if options.json => imports_json(options, out, err),
        Command::Imports => imports(options, out, err),
    }
}

/// Load the root file and everything it reaches, then run phase 2.
/// Returns `None` when the root itself could not be loaded.
fn load(options: &Options, err: &mut impl Write) -> Result<Option<(Session, ModuleId)>, CliError> {
    let config = options.resolver_config()?;
    let mut session = Session::new(config, SharedInterner::new());
    match session.load_root(&options.file) {
        Ok(root) => {
            session.analyze();
            Ok(Some((session, root)))
        }
        Err(error) => {
            emit_error(&session, &error, err)?;
            write_summary(1, err)?;
            Ok(None)
        }
    }
}

/// Report collected errors; true when there were none.
fn report(session: &Session, err: &mut impl Write) -> Result<bool, CliError> {
    for error in session.errors() {
        emit_error(session, error, err)?;
    }
    let count = session.errors().len();
    if count > 0 {
        write_summary(count, err)?;
    }
    Ok(count == 0)
}

fn check(options: &Options, out: &mut impl Write, err: &mut impl Write) -> Result<bool, CliError> {
    let Some((session, _)) = load(options, err)? else {
        return Ok(false);
    };
    let ok = report(&session, err)?;
    if ok {
        writeln!(
            out,
            "OK: {} ({} module{})",
            options.file.display(),
            session.cache().len(),
            if session.cache().len() == 1 { "" } else { "s" }
        )?;
    }
    Ok(ok)
}

fn deps(options: &Options, out: &mut impl Write, err: &mut impl Write) -> Result<bool, CliError> {
    let Some((session, _)) = load(options, err)? else {
        return Ok(false);
    };
    let ok = report(&session, err)?;

    let records: Vec<_> = session
        .cache()
        .modules()
        .flat_map(|m| dependency_records(session.cache(), m.id, session.interner()))
        .collect();
    if options.json {
        writeln!(out, "{}", to_json(&records)?)?;
    } else {
        for record in &records {
            writeln!(out, "{}", record.to_line())?;
        }
    }
    Ok(ok)
}

/// Parse the file alone and print its imports; nothing is loaded.
fn imports(
    options: &Options,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CliError> {
    let source = std::fs::read_to_string(&options.file)?;
    let interner = SharedInterner::new();
    let output = strand_parse::parse_source(&source, &interner);
    if output.has_errors() {
        let path = options.file.display().to_string();
        let file = SourceFile::new(&path, &source);
        let diagnostics = output.diagnostics(&source);
        emit_all(&diagnostics, &file, err)?;
        write_summary(diagnostics.len(), err)?;
        return Ok(false);
    }
    for decl in &output.module.imports {
        writeln!(out, "{}", render_import(decl, &interner))?;
    }
    Ok(true)
}

fn imports_json(
    options: &Options,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CliError> {
    let Some((session, root)) = load(options, err)? else {
        return Ok(false);
    };
    let ok = report(&session, err)?;
    let imports = import_json(session.cache(), root, session.interner());
    writeln!(out, "{}", to_json(&imports)?)?;
    Ok(ok)
}

/// Render an import error against the file it belongs to, followed by the
/// parser diagnostics it carries.
fn emit_error(
    session: &Session,
    error: &ImportError,
    err: &mut impl Write,
) -> Result<(), CliError> {
    let diagnostic = error.to_diagnostic();
    let origin = error.origin.as_deref();
    let path = origin.map(|p| p.display().to_string());
    let source = origin.and_then(|p| {
        session
            .cache()
            .modules()
            .find(|m| m.file() == p)
            .map(|m| m.source.as_str())
    });
    let file = path
        .as_deref()
        .zip(source)
        .map(|(path, text)| SourceFile::new(path, text));
    writeln!(err, "{}", render(&diagnostic, file.as_ref()))?;

    if let Some(nested) = &error.nested {
        let path = nested.file.display().to_string();
        let file = SourceFile::new(&path, &nested.source);
        emit_all(&nested.diagnostics, &file, err)?;
    }
    Ok(())
}

fn emit_all(
    diagnostics: &[Diagnostic],
    file: &SourceFile<'_>,
    err: &mut impl Write,
) -> Result<(), CliError> {
    for diagnostic in diagnostics {
        writeln!(err, "{}", render(diagnostic, Some(file)))?;
    }
    Ok(())
}

fn write_summary(count: usize, err: &mut impl Write) -> Result<(), CliError> {
    let plural = if count == 1 { "" } else { "s" };
    writeln!(err, "error: aborting due to {count} previous error{plural}")?;
    Ok(())
}
