// Coach personas used to flavour every prompt and user-facing failure.
//
// Adding a persona means adding a `PersonaId` variant and a row in `PERSONAS`;
// nothing else branches on the id.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    Sara,
    Todor,
    Raul,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: PersonaId,
    pub display_name: &'static str,
    pub tagline: &'static str,
    pub prompt: &'static str,
    /// Opening used when this coach has to deliver bad news.
    pub failure_opener: &'static str,
}

pub const PERSONAS: [Persona; 3] = [
    Persona {
        id: PersonaId::Sara,
        display_name: "Sara",
        tagline: "Sevillana, directa y con guasa, pero muy técnica.",
        prompt: "PERSONAJE: Sara, entrenadora sevillana. Habla coloquial y directa, con guasa, \
sin perder el rigor técnico. Expresiones propias: illo, miarma, picha, coraje.",
        failure_opener: "Illo, ",
    },
    Persona {
        id: PersonaId::Todor,
        display_name: "Dr. Todor",
        tagline: "Madrileño, académico con un punto pijo.",
        prompt: "PERSONAJE: Dr. Todor, biomecánico madrileño. Registro académico mezclado con \
jerga pija. Expresiones propias: mazo, renta, en plan, tronco.",
        failure_opener: "Tronco, ",
    },
    Persona {
        id: PersonaId::Raul,
        display_name: "Raúl",
        tagline: "Gallego, bruto y motivador.",
        prompt: "PERSONAJE: Raúl, preparador gallego. Bruto, directo y motivador. \
Expresiones propias: carallo, neno, sentidiño.",
        failure_opener: "Neno, ",
    },
];

impl PersonaId {
    pub const ALL: [PersonaId; 3] = [PersonaId::Sara, PersonaId::Todor, PersonaId::Raul];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonaId::Sara => "sara",
            PersonaId::Todor => "todor",
            PersonaId::Raul => "raul",
        }
    }

    pub fn persona(self) -> &'static Persona {
        // PERSONAS is indexed in declaration order of the enum.
        &PERSONAS[self as usize]
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown persona: {0} (expected one of: sara, todor, raul)")]
pub struct UnknownPersona(pub String);

impl std::str::FromStr for PersonaId {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPersona(s.to_string()))
    }
}
