/// One of the twelve derived verb forms (awzan) of the Arabic verb.
#[derive(Debug, Clone)]
pub struct VerbForm {
    pub key: &'static str,
    pub pattern: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// The static form table, built once at startup and passed by reference
/// wherever definitions are patched.
#[derive(Debug)]
pub struct VerbForms {
    forms: Vec<VerbForm>,
}

impl VerbForms {
    pub fn table() -> Self {
        let forms = vec![
            VerbForm {
                key: "I",
                pattern: "فَعَل/فَعُل/فَعِل",
                description: "Basic root",
                example: "ضَرَبَ - He hit",
            },
            VerbForm {
                key: "II",
                pattern: "فَعّل",
                description: "Doing something intensively/ repeatedly, doing or causing something to someone else",
                example: "علّم - He taught",
            },
            VerbForm {
                key: "III",
                pattern: "فَاعَل",
                description: "To try to do something, to do something with someone else",
                example: "قاتل - He fought",
            },
            VerbForm {
                key: "IV",
                pattern: "أَفْعَل",
                description: "Transitive, immediate, doing something to other/ someone else, causing something",
                example: "اكْرَمَ - He honored",
            },
            VerbForm {
                key: "V",
                pattern: "تَفَعّل",
                description: "Doing something intensively/ repeatedly, doing or causing something to yourself",
                example: "تَمَتَّعَ - He enjoyed",
            },
            VerbForm {
                key: "VI",
                pattern: "تَفَاعَل",
                description: "Doing something with each other, to pretend to do something, expressing a state",
                example: "تَبادَلَ - He exchanged",
            },
            VerbForm {
                key: "VII",
                pattern: "اِنْفَعَل",
                description: "Intransitive, Passive meaning",
                example: "اِنكَسَرَ - He broke",
            },
            VerbForm {
                key: "VIII",
                pattern: "اِفْتَعَل",
                description: "No consistent meaning pattern, being in a state of something",
                example: "اِجتَنَبَ - He avoided",
            },
            VerbForm {
                key: "IX",
                pattern: "اِفْعَل",
                description: "Used for colors or defects",
                example: "اِحمرّ - He became red",
            },
            VerbForm {
                key: "X",
                pattern: "اِسْتَفْعَل",
                description: "To seek or ask something, wanting, trying",
                example: "اِسْتَغفر - He sought forgiveness",
            },
            VerbForm {
                key: "XI",
                pattern: "اِفْعالَّ",
                description: "Like Form IX used for colors or defects but more temporary or intense",
                example: "اِحْمارَّ - He became temporarily or extremely red",
            },
            VerbForm {
                key: "XII",
                pattern: "اِفْعَوْعَلَ",
                description: "Like Form XI tend to refer to a colour or physical quality",
                example: "اِخْشَوْشَنَ - He became rough, coarse",
            },
        ];
        Self { forms }
    }

    /// Replace each inline `<b>II</b>`-style form marker in a Hans Wehr
    /// definition with an annotated block naming the form's pattern,
    /// meaning and an example.
    ///
    /// Plain textual substitution with exact delimiters: a numeral that
    /// appears without the bold wrapping is left alone, and patched text
    /// contains no marker anymore, so patching is idempotent. The twelve
    /// keys are independent; `<b>II</b>` never matches the `I` marker
    /// because the closing tag must follow immediately.
    pub fn patch(&self, definition: &str) -> String {
        let mut out = definition.to_string();
        for form in &self.forms {
            let marker = format!("<b>{}</b>", form.key);
            let annotated = format!(
                "\n* {} ({}): {}, e.g. {}\n",
                form.key, form.pattern, form.description, form.example
            );
            out = out.replace(&marker, &annotated);
        }
        out
    }
}
