//! Extraction prompt.

const SYSTEM_PROMPT: &str = "\
You extract structured information from text to build a knowledge graph.
Capture as much information from the text as possible without adding anything
that is not explicitly stated.

Nodes are entities and concepts. Give every node an `id` that is the name or
human-readable identifier found in the text (never an integer) and a `type`
that is a basic, general label such as \"Person\" rather than \"Mathematician\".
Use the most complete form of a name for every mention of the same entity, so
that \"John Doe\", \"Joe\" and \"he\" all become \"John Doe\".

Relationships connect two nodes. Use general, timeless relationship types such
as \"PROFESSOR\" rather than \"BECAME_PROFESSOR\". Every relationship endpoint
must also appear in the node list.

Answer with one JSON object and nothing else:
{
  \"nodes\": [{\"id\": \"...\", \"type\": \"...\"}],
  \"relationships\": [
    {
      \"source_node_id\": \"...\",
      \"source_node_type\": \"...\",
      \"target_node_id\": \"...\",
      \"target_node_type\": \"...\",
      \"type\": \"...\"
    }
  ]
}";

/// System and user prompt pair.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system: String,
    pub user_prefix: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user_prefix: "Extract the nodes and relationships from the following input. \
                          Reply with the JSON object only.\n\nInput:\n"
                .to_string(),
        }
    }
}

impl PromptTemplate {
    /// Build `(system, user)` messages for one text.
    pub fn build(&self, text: &str) -> (String, String) {
        (self.system.clone(), format!("{}{}", self.user_prefix, text))
    }
}
