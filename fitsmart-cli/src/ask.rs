use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use fitsmart_core::persona::PersonaId;
use fitsmart_core::types::ProfileAnswers;

use crate::cli::AnalyzeArgs;
use crate::render;

/// Line-based questions on an interactive terminal.
pub struct Asker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Asker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{question} ").context("write prompt")?;
        self.output.flush().context("flush prompt")?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read answer")?;
        if read == 0 {
            bail!("input closed while waiting for: {question}");
        }
        Ok(line.trim().to_string())
    }

    pub fn ask_persona(&mut self) -> anyhow::Result<PersonaId> {
        writeln!(self.output, "Elige a tu entrenador:\n{}", render::persona_table())
            .context("write persona list")?;
        loop {
            let answer = self.ask("Entrenador (sara/todor/raul):")?;
            match answer.parse::<PersonaId>() {
                Ok(id) => return Ok(id),
                Err(e) => writeln!(self.output, "{e}").context("write persona error")?,
            }
        }
    }

    /// Fills in whatever the command line left out.
    pub fn complete_answers(&mut self, args: &AnalyzeArgs) -> anyhow::Result<ProfileAnswers> {
        let mut field = |given: &Option<String>, question: &str| match given {
            Some(value) => Ok(value.clone()),
            None => self.ask(question),
        };
        Ok(ProfileAnswers {
            experience: field(&args.experience, "¿Cuánta experiencia tienes entrenando?")?,
            goal: field(&args.goal, "¿Cuál es tu objetivo principal?")?,
            injuries: field(&args.injuries, "¿Tienes alguna lesión o molestia?")?,
            custom_answer: field(&args.answer, "¿Algo más que deba saber tu entrenador?")?,
        })
    }
}
