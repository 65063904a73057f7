//! Instructions and the response schema sent to the generation service.

use serde_json::{Value, json};

/// Fields the service must always fill in; `funFact` is optional.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "word",
    "wordClass",
    "definition",
    "etymology",
    "usageExample",
    "inflections",
];

pub fn random_word_prompt() -> String {
    r#"Generer et tilfeldig, interessant norsk ord.

Kriterier:
1. Velg et ord med en spennende etymologi eller historie.
2. Det kan være et gammelt ord som fortsatt er i bruk, eller et poetisk ord.
3. Unngå trivielle ord som "hei" eller "hus", med mindre historien deres er overraskende.
4. Forklar etymologien grundig og strukturert. Bruk punktlister (start linjen med -) for røtter, beslektede språk og historiske stadier."#
        .to_string()
}

pub fn lookup_prompt(word: &str) -> String {
    format!(
        r#"Gi meg detaljert informasjon om det norske ordet "{word}".

Kriterier:
1. Definer ordet presist.
2. Forklar etymologien grundig. Bruk punktlister (start linjen med -) for røtter, beslektede språk og historiske stadier, og avsnitt for løpende tekst.
3. Har ordet flere betydninger, velg den vanligste eller mest interessante.
4. List opp bøyningsformene korrekt."#
    )
}

pub fn illustration_prompt(word: &str, definition: &str, etymology: &str) -> String {
    format!(
        r#"Lag en kunstnerisk illustrasjon av høy kvalitet for det norske ordet "{word}".

Betydning: {definition}
Etymologisk bakgrunn: {etymology}

Stil:
- Klassisk bokillustrasjon møter moderne minimalisme.
- Farger: dype nordiske toner (blått, skoggrønt, hvitt, varmt treverk).
- Bildet skal vise ordets betydning ELLER dets historiske opprinnelse.
- Ingen tekst i bildet.
- Format: 4:3."#
    )
}

/// Structured-output schema mirroring [`crate::WordRecord`].
pub fn word_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING", "description": "Det norske ordet." },
            "wordClass": { "type": "STRING", "description": "Ordklasse (f.eks. Substantiv, Verb)." },
            "definition": { "type": "STRING", "description": "En tydelig definisjon av ordet." },
            "etymology": {
                "type": "STRING",
                "description": "Grundig beskrivelse av ordets opprinnelse. Bruk ' - ' for punktlister over røtter og språk, og avsnitt for å dele opp teksten."
            },
            "usageExample": { "type": "STRING", "description": "En setning som bruker ordet i kontekst." },
            "inflections": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Bøyningsformer (entall, flertall, bestemt form osv.)."
            },
            "funFact": { "type": "STRING", "description": "En kort, morsom fakta om ordet, hvis relevant." }
        },
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prompt_embeds_the_exact_word() {
        let prompt = lookup_prompt("bautastein");
        assert!(prompt.contains("\"bautastein\""));
    }

    #[test]
    fn illustration_prompt_carries_inputs_and_constraints() {
        let prompt = illustration_prompt("fjord", "En lang havarm.", "Norrønt fjǫrðr.");
        assert!(prompt.contains("\"fjord\""));
        assert!(prompt.contains("En lang havarm."));
        assert!(prompt.contains("Norrønt fjǫrðr."));
        assert!(prompt.contains("4:3"));
        assert!(prompt.contains("Ingen tekst"));
    }

    #[test]
    fn schema_requires_everything_but_fun_fact() {
        let schema = word_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        assert!(!required.contains(&"funFact"));
        assert_eq!(schema["properties"]["inflections"]["type"], "ARRAY");
        assert_eq!(schema["properties"].as_object().unwrap().len(), 7);
    }
}
