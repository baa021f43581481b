//! The guided onboarding flow: welcome, phone, confirmation, success

use serde::Serialize;

/// One step of the onboarding flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: &'static str,
    pub title: &'static str,
    pub instruction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Spoken when the step is entered; may contain `{name}` and `{phone}`
    pub voice_prompt: &'static str,
    pub show_phone_input: bool,
}

/// Default Portuguese flow
pub const DEFAULT_STEPS: [Step; 4] = [
    Step {
        id: "welcome",
        title: "Bem-vindo ao Papo Social!",
        instruction: "Vamos começar com seu nome. Clique no botão e se apresente.",
        placeholder: Some("Ex: \"Olá, me chamo Maria\" ou \"Meu nome é João\""),
        voice_prompt: "Olá! Como você se chama?",
        show_phone_input: false,
    },
    Step {
        id: "phone",
        title: "Quase lá!",
        instruction: "Para sua segurança, precisamos do seu número de telefone.",
        placeholder: None,
        voice_prompt: "Por favor, digite seu número de telefone.",
        show_phone_input: true,
    },
    Step {
        id: "confirmation",
        title: "Prazer em conhecê-lo!",
        instruction: "Vamos confirmar seus dados. Está tudo correto?",
        placeholder: None,
        voice_prompt: "Entendi que seu nome é {name} e seu telefone é {phone}. Está correto?",
        show_phone_input: false,
    },
    Step {
        id: "success",
        title: "Perfeito!",
        instruction: "Sua conta foi criada com sucesso!",
        placeholder: None,
        voice_prompt: "Ótimo! Sua conta foi criada. Bem-vindo ao Papo Social!",
        show_phone_input: false,
    },
];

/// Fill `{name}` and `{phone}` placeholders in a voice prompt
#[must_use]
pub fn render_prompt(template: &str, name: &str, phone: &str) -> String {
    template.replace("{name}", name).replace("{phone}", phone)
}

/// Cursor over a list of steps; moves are clamped to the list bounds
#[derive(Debug, Clone)]
pub struct StepNavigator<'a> {
    steps: &'a [Step],
    current: usize,
}

impl Default for StepNavigator<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_STEPS)
    }
}

impl<'a> StepNavigator<'a> {
    /// Start at the first step
    #[must_use]
    pub const fn new(steps: &'a [Step]) -> Self {
        Self { steps, current: 0 }
    }

    /// Index of the current step
    #[must_use]
    pub const fn index(&self) -> usize {
        self.current
    }

    /// The current step, `None` only for an empty flow
    #[must_use]
    pub fn current(&self) -> Option<&'a Step> {
        self.steps.get(self.current)
    }

    /// Advance unless already on the last step
    pub fn advance(&mut self) -> Option<&'a Step> {
        if self.current + 1 < self.steps.len() {
            self.current += 1;
        }
        self.current()
    }

    /// Go back unless already on the first step
    pub fn previous(&mut self) -> Option<&'a Step> {
        self.current = self.current.saturating_sub(1);
        self.current()
    }

    /// Jump to `index`; out-of-range jumps are ignored
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.steps.len() {
            self.current = index;
            true
        } else {
            tracing::debug!(index, len = self.steps.len(), "ignoring out-of-range step jump");
            false
        }
    }

    /// Back to the first step
    pub const fn reset(&mut self) {
        self.current = 0;
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }
}
