//! Instruction templates per task.

use cloak_core::EntityType;

use crate::types::Task;

const DETECT_PREAMBLE: &str = "You are an expert in cybersecurity and data privacy. \
You are now tasked to detect PII from the given text, using the following taxonomy only:";

const DETECT_RULES: &str = "For the given message that a user sends to a chatbot, identify all the \
personally identifiable information using the above taxonomy only, and the entity_type should be \
selected from the all-caps categories.
Note that the information should be related to a real person not in a public context, but okay if \
not uniquely identifiable.
Result should be in its minimum possible unit.
Return me ONLY a json object in the following format (no other extra text!): \
{\"results\": [{\"entity_type\": YOU_DECIDE_THE_PII_TYPE, \"text\": PART_OF_MESSAGE_YOU_IDENTIFIED_AS_PII}]}";

pub const CLUSTER_PROMPT: &str = "For the given message, find ALL segments of the message with the \
same contextual meaning as the given PII. Consider segments that are semantically related or could be \
inferred from the original PII or share a similar context or meaning. List all of them in a list, and \
each segment should only appear once in each list. Please return only in JSON format. Each PII \
provided will be a key, and its value would be the list PIIs (include itself) that has the same \
contextual meaning.

Example 1:
Input:
<message>I will be the valedictorian of my class. Please write me a presentation based on the \
following information: As a student at Vanderbilt University, I feel honored. The educational journey \
at Vandy has been nothing less than enlightening. The dedicated professors here at Vanderbilt are the \
best. As an 18 year old student at VU, the opportunities are endless.</message>
<pii1>Vanderbilt University</pii1>
<pii2>18 year old</pii2>
<pii3>VU</pii3>
Expected JSON output:
{\"Vanderbilt University\": [\"Vanderbilt University\", \"Vandy\", \"VU\", \"Vanderbilt\"], \
\"18 year old\": [\"18 year old\"], \"VU\": [\"VU\", \"Vanderbilt University\", \"Vandy\", \"Vanderbilt\"]}

Example 2:
Input:
<message>Do you know Bill Gates and the company he founded, Microsoft? Can you send me an article \
about how he founded it to my email at jeremyKwon@gmail.com please?</message>
<pii1>Bill Gates</pii1>
<pii2>jeremyKwon@gmail.com</pii2>
Expected JSON output:
{\"Bill Gates\": [\"Bill Gates\", \"Microsoft\"], \"jeremyKwon@gmail.com\": [\"jeremyKwon@gmail.com\"]}";

pub const ABSTRACT_PROMPT: &str = "Rewrite the text to abstract the protected information, and don't \
change other parts. Please return with JSON format.
For example if the input is:
<Text>I graduated from CMU, and I earn a six-figure salary now. Today in the office, I had some \
conflict with my boss, and I am thinking about whether I should start interviewing with other \
companies to get a better offer.</Text>
<ProtectedInformation>CMU, Today</ProtectedInformation>
Then the output JSON format should be: {\"results\": YOUR_REWRITE} where YOUR_REWRITE needs to be a \
string that no longer contains ProtectedInformation, here's a sample YOUR_REWRITE: I graduated from a \
prestigious university, and I earn a six-figure salary now. Recently in the office, I had some \
conflict with my boss, and I am thinking about whether I should start interviewing with other \
companies to get a better offer.";

/// Build the detection instruction for the configured taxonomy.
pub fn detect_prompt(taxonomy: &[EntityType]) -> String {
    let mut prompt = String::from(DETECT_PREAMBLE);
    for entity in taxonomy {
        prompt.push('\n');
        prompt.push_str(entity.label());
        if let Some(desc) = entity.description() {
            prompt.push_str(": ");
            prompt.push_str(desc);
        }
    }
    prompt.push('\n');
    prompt.push_str(DETECT_RULES);
    prompt
}

pub fn instruction(task: Task, taxonomy: &[EntityType]) -> String {
    match task {
        Task::Detect => detect_prompt(taxonomy),
        Task::Cluster => CLUSTER_PROMPT.to_string(),
        Task::Abstract => ABSTRACT_PROMPT.to_string(),
    }
}

/// Wrap a message and its spans in the tag layout the cluster examples use.
pub fn cluster_input(message: &str, spans: &[String]) -> String {
    let mut out = format!("<message>{}</message>", message);
    for (i, span) in spans.iter().enumerate() {
        out.push_str(&format!("\n<pii{n}>{span}</pii{n}>", n = i + 1, span = span));
    }
    out
}

/// Wrap a text and its protected spans in the tag layout the abstract example uses.
pub fn abstract_input(text: &str, protected: &[String]) -> String {
    format!(
        "<Text>{}</Text>\n<ProtectedInformation>{}</ProtectedInformation>",
        text,
        protected.join(", ")
    )
}
