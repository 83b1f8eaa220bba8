//! DSL compiler — sentence-like timetable source → tokens → AST → schedule model.

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod names;
pub mod parser;
pub mod token;

pub use ast::*;
pub use compile::{compile_schedule, SlotResolver};
pub use error::{CompileError, Diagnostic};

use chrono::Local;

use crate::config::{CompilerConfig, Settings};
use crate::model::ScheduleModel;
use lexer::Lexer;
use parser::Parser;

/// The DSL compiler.
///
/// Parses source text through lexer → parser → AST, then resolves the AST
/// into a [`ScheduleModel`].
pub struct Compiler;

impl Compiler {
    /// Parse DSL source into a Schedule AST. Unrecognized sentences are
    /// skipped and logged.
    pub fn parse(source: &str) -> Result<Schedule, CompileError> {
        Self::parse_with_diagnostics(source).map(|(schedule, _)| schedule)
    }

    /// Like [`Compiler::parse`], also returning the tokens the parser skipped.
    pub fn parse_with_diagnostics(source: &str) -> Result<(Schedule, Vec<Diagnostic>), CompileError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens);
        let schedule = parser.parse();
        Ok((schedule, parser.diagnostics().to_vec()))
    }

    /// Parse and compile DSL source, with `settings` as fallbacks for what the
    /// source leaves unsaid.
    pub fn compile(source: &str, settings: &Settings) -> Result<ScheduleModel, CompileError> {
        let schedule = Self::parse(source)?;
        let config = CompilerConfig::resolve(settings, &schedule, Local::now().date_naive())?;
        compile_schedule(&schedule, &config)
    }
}
