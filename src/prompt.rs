//! Prompt templates for the two model calls of the pipeline.
//!
//! Both builders are pure: the episode text is placed between a fixed head and
//! a fixed tail by concatenation, so braces or placeholders inside the episode
//! text are never interpreted.

const DATE_PROMPT_HEAD: &str = r#"Sie sind ein Spezialist für die Extraktion historischer Daten. Ihre Aufgabe ist es, die Beschreibungen von Podcast-Episoden zu analysieren und den Zeitraum zu bestimmen, über den gesprochen wird. Bitte geben Sie die Anfangs- und Enddaten der erwähnten historischen Ereignisse oder Zeiträume an.

Regeln:
1. Verwenden Sie immer das Format +YYYY für Jahreszahlen nach Christus und -YYYY für Jahreszahlen vor Christus, immer mit Vorzeichen und vierstellig mit führenden Nullen (z. B. +1789 statt „18. Jahrhundert“ oder „1700er“, -0053 statt „53 v. Chr.“).
2. Wenn keine genauen Daten genannt werden, nutzen Sie Ihr Wissen, um eine fundierte Schätzung vorzunehmen.
3. Wenn ein einjähriges Ereignis erwähnt wird, verwenden Sie dasselbe Jahr als Anfangs- und Enddatum.
4. Nur wenn eine Zeitspanne grob angegeben ist, z. B. Mittelalter oder altes Ägypten, dann wählen Sie die übliche Zeitspanne für das Mittelalter oder das alte Ägypten aus.

Hier sind einige Beispiele:

Beispiel 1:
Input: "Wir springen in dieser Folge ins Jahr 53 vdZw., als sich in einer Ebene in Mesopotamien zwei Heere gegenüber stehen. Auf der einen Seite das des Partherreichs, angeführt von Surena, auf der anderen eines der Römischen Republik, angeführt von M. Licinius Crassus. Wir werden in dieser Folge über diese Schlacht, die Osterweiterung Roms und die Folgen der Schlacht für die Römische Republik sprechen."
Output: {"start_date": "-0053", "end_date": "-0053"}

Beispiel 2:
Input: "Im November 1532 nehmen spanische Konquistadoren unter dem Kommando von Francisco Pizarro den letzten König der Inka gefangen: Atahualpa. Dabei gelangen sie an Unmengen Gold und Silber. Spätestens jetzt sind viele Konquistadoren überzeugt, dass die Gerüchte um ein sagenumwobenes Goldland wahr sind. Liegen die Ursprünge der Eldorado-Legende vielleicht bei einem kleinen Bergsee bei Guatavita im heutigen Kolumbien? Wir sprechen in der Folge über deutsche Konquistadoren, die sich für die Welser in Klein-Venedig auf die Jagd nach Eldorado machten und über Philipp von Hutten, den Generalkapitän Venezuelas, dessen Goldsuche auf tragische Weise endete – ohne Goldfund."
Output: {"start_date": "+1532", "end_date": "+1532"}

Beispiel 3:
Input: "Wir springen diesmal in die 2. Hälfte des 18. Jahrhunderts. Automaten, also mechanische Konstrukte, die selbständig jene Dinge tun, die eigentlich lebenden Wesen vorbehalten waren, sind gerade der große Renner. Und auch in Wien konstruiert der Beamte Wolfgang von Kempelen einen solchen Automaten um die Kaiserin zu beeindrucken. Wir sprechen über diesen Automaten – den Schachtürken – und die Erfolge, die er bald darauf in ganz Europa feiern wird. Doch der faszinierende Automat birgt ein Geheimnis, das die Menschen selbst lang nach dem Ableben seines Erschaffers beschäftigen wird."
Output: {"start_date": "+1750", "end_date": "+1800"}

Beispiel 4:
Input: "Wir springen nach Amsterdam: 1661 beginnt dort der Katholik Jan Hartmann, eine Kirche in sein Grachtenhaus zu bauen. Es entstand eine beeindruckende Kirche, die bis zum Ende des 19. Jahrhunderts genutzt wurde, ehe sie 1888 zu einem Museum wurde, das noch heute besucht werden kann: das Museum Ons’ Lieve Heer op Solder. Um zu klären, warum Jan Hartmann das gemacht hat, sprechen wir über eine faszinierende Zeit in der niederländischen Geschichte: Die Reformation, den Achtzigjährigen Krieg und das Goldene Zeitalter, in dem Amsterdam zu einer der bedeutendsten Städte der Welt wurde."
Output: {"start_date": "+1661", "end_date": "+1888"}

Analysieren Sie nun bitte die folgende Episodenbeschreibung und geben Sie den Zeitraum im gleichen Format an:

"#;

const DATE_PROMPT_TAIL: &str = r#"

Denken Sie daran:
    - Geben Sie genaue Daten an, wenn sie klar angegeben sind.
    - Nehmen Sie fundierte Schätzungen auf der Grundlage des historischen Kontexts vor, wenn keine genauen Daten angegeben sind.
    - Geben Sie Ihre Antwort im JSON-Format mit den Feldern „start_date“ und „end_date“ zurück.

Antworten Sie AUSSCHLIESSLICH mit einem JSON-Objekt in folgendem Format:
{"start_date": "+YYYY", "end_date": "+YYYY"}
"#;

const SEARCH_TERM_PROMPT_HEAD: &str = r#"Sie sind ein Rechercheassistent für Geschichtsthemen. Ihre Aufgabe ist es, aus der Beschreibung einer Podcast-Episode den einen Suchbegriff abzuleiten, unter dem die deutschsprachige Wikipedia den passendsten Artikel zum Hauptthema der Episode führt.

Regeln:
1. Geben Sie genau einen Suchbegriff zurück, ohne Anführungszeichen, ohne Erklärung und ohne Satzzeichen am Ende.
2. Bevorzugen Sie das konkrete Ereignis, die Person oder den Ort, um den sich die Episode dreht, vor allgemeinen Epochen.
3. Verwenden Sie die in der deutschsprachigen Wikipedia übliche Schreibweise des Artikeltitels.
4. Der Suchbegriff soll höchstens fünf Wörter lang sein.

Hier sind einige Beispiele:

Beispiel 1:
Input: "Wir springen in dieser Folge ins Jahr 53 vdZw., als sich in einer Ebene in Mesopotamien zwei Heere gegenüber stehen. Auf der einen Seite das des Partherreichs, angeführt von Surena, auf der anderen eines der Römischen Republik, angeführt von M. Licinius Crassus."
Output: Schlacht bei Carrhae

Beispiel 2:
Input: "Im November 1532 nehmen spanische Konquistadoren unter dem Kommando von Francisco Pizarro den letzten König der Inka gefangen: Atahualpa. Liegen die Ursprünge der Eldorado-Legende vielleicht bei einem kleinen Bergsee bei Guatavita im heutigen Kolumbien?"
Output: El Dorado

Beispiel 3:
Input: "Wir springen diesmal in die 2. Hälfte des 18. Jahrhunderts. In Wien konstruiert der Beamte Wolfgang von Kempelen einen Automaten, um die Kaiserin zu beeindrucken. Wir sprechen über diesen Automaten – den Schachtürken."
Output: Schachtürke

Beispiel 4:
Input: "Wir springen nach Amsterdam: 1661 beginnt dort der Katholik Jan Hartmann, eine Kirche in sein Grachtenhaus zu bauen, die 1888 zu einem Museum wurde."
Output: Museum Ons’ Lieve Heer op Solder

Beispiel 5:
Input: "In dieser Folge geht es um den Ausbruch des Vesuv und darum, wie die Asche eine ganze römische Stadt unter sich begrub und sie für die Archäologie konservierte."
Output: Pompeji

Beispiel 6:
Input: "Im Sommer 1816 bleibt in weiten Teilen Europas der Sommer aus. Wir sprechen über Missernten, Hungersnöte und einen Vulkanausbruch auf der anderen Seite der Welt."
Output: Jahr ohne Sommer

Nennen Sie nun den Suchbegriff für die folgende Episodenbeschreibung:

"#;

const SEARCH_TERM_PROMPT_TAIL: &str = r#"

Suchbegriff:"#;

/// Renders the date-extraction prompt around `episode_text`.
///
/// Deterministic: the same input always yields byte-identical output.
pub fn build_date_prompt(episode_text: &str) -> String {
    wrap(DATE_PROMPT_HEAD, episode_text, DATE_PROMPT_TAIL)
}

/// Renders the prompt asking for a single encyclopedia search phrase.
pub fn build_search_term_prompt(episode_text: &str) -> String {
    wrap(SEARCH_TERM_PROMPT_HEAD, episode_text, SEARCH_TERM_PROMPT_TAIL)
}

fn wrap(head: &str, body: &str, tail: &str) -> String {
    let body = body.trim();
    let mut prompt = String::with_capacity(head.len() + body.len() + tail.len());
    prompt.push_str(head);
    prompt.push_str(body);
    prompt.push_str(tail);
    prompt
}
