//! Standalone HTML page for a `Network`, using vis-network from a CDN.

use crate::network::Network;

const VIS_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.2/dist/vis-network.min.js";
const VIS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.2/dist/dist/vis-network.min.css";

const FILTER_MENU: &str = r#"<div id="filter-menu">
  <select id="filter-attribute">
    <option value="group">group</option>
    <option value="label">label</option>
  </select>
  <select id="filter-values" multiple size="4"></select>
  <button id="filter-apply" type="button">Filter</button>
  <button id="filter-reset" type="button">Reset</button>
</div>
"#;

const FILTER_SCRIPT: &str = r#"
  function kgFillValues() {
    var attribute = document.getElementById("filter-attribute").value;
    var select = document.getElementById("filter-values");
    var seen = {};
    nodes.get().forEach(function (n) { seen[String(n[attribute])] = true; });
    select.innerHTML = "";
    Object.keys(seen).sort().forEach(function (v) {
      var option = document.createElement("option");
      option.value = v;
      option.textContent = v;
      select.appendChild(option);
    });
  }
  function kgApplyFilter() {
    var attribute = document.getElementById("filter-attribute").value;
    var chosen = Array.prototype.map.call(
      document.getElementById("filter-values").selectedOptions,
      function (o) { return o.value; }
    );
    if (chosen.length === 0) { return kgResetFilter(); }
    nodes.update(nodes.get().map(function (n) {
      return { id: n.id, hidden: chosen.indexOf(String(n[attribute])) === -1 };
    }));
  }
  function kgResetFilter() {
    nodes.update(nodes.get().map(function (n) { return { id: n.id, hidden: false }; }));
  }
  document.getElementById("filter-attribute").addEventListener("change", kgFillValues);
  document.getElementById("filter-apply").addEventListener("click", kgApplyFilter);
  document.getElementById("filter-reset").addEventListener("click", kgResetFilter);
  kgFillValues();
"#;

/// Make JSON safe to inline inside a `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Make text safe for an HTML attribute or style block.
fn attr_safe(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';' | '{' | '}'))
        .collect()
}

/// Render the full page.
pub fn to_html(network: &Network) -> serde_json::Result<String> {
    let options = network.options();
    let nodes = script_safe(&serde_json::to_string(&network.nodes().collect::<Vec<_>>())?);
    let edges = script_safe(&serde_json::to_string(&network.edges().collect::<Vec<_>>())?);
    let vis_options = script_safe(&serde_json::to_string(&network.physics().to_vis_options())?);

    let bgcolor = attr_safe(&options.bgcolor);
    let mut page = String::with_capacity(4096 + nodes.len() + edges.len());

    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Knowledge Graph</title>\n");
    page.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", VIS_CSS));
    page.push_str(&format!("<script src=\"{}\"></script>\n", VIS_JS));
    page.push_str(&format!(
        "<style>\n\
         body {{ margin: 0; background-color: {bg}; }}\n\
         #mynetwork {{ width: {w}; height: {h}; background-color: {bg}; \
         border: 1px solid lightgray; position: relative; }}\n",
        bg = bgcolor,
        w = attr_safe(&options.width),
        h = attr_safe(&options.height),
    ));
    if options.filter_menu {
        page.push_str(&format!(
            "#filter-menu {{ padding: 8px; background-color: {}; color: {}; }}\n",
            bgcolor,
            attr_safe(&options.font_color),
        ));
    }
    page.push_str("</style>\n");
    page.push_str("</head>\n<body>\n");

    if options.filter_menu {
        page.push_str(FILTER_MENU);
    }
    page.push_str("<div id=\"mynetwork\"></div>\n<script>\n");
    page.push_str(&format!("  var nodes = new vis.DataSet({});\n", nodes));
    page.push_str(&format!("  var edges = new vis.DataSet({});\n", edges));
    page.push_str(&format!("  var options = {};\n", vis_options));
    page.push_str(
        "  var container = document.getElementById(\"mynetwork\");\n  \
         var network = new vis.Network(container, { nodes: nodes, edges: edges }, options);\n",
    );
    if options.filter_menu {
        page.push_str(FILTER_SCRIPT);
    }
    page.push_str("</script>\n</body>\n</html>\n");

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkOptions;

    fn sample() -> Network {
        let mut net = Network::new(NetworkOptions::default());
        net.add_node("Alice", "Alice", "Person", "Person").unwrap();
        net.add_node("Acme", "Acme", "Organization", "Organization").unwrap();
        net.add_edge("Alice", "Acme", "works_at").unwrap();
        net
    }

    #[test]
    fn test_page_embeds_data_and_assets() {
        let page = to_html(&sample()).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(VIS_JS));
        assert!(page.contains("\"label\":\"works_at\""));
        assert!(page.contains("\"solver\":\"forceAtlas2Based\""));
        assert!(page.contains("height: 1200px"));
        assert!(page.contains("background-color: #222222"));
        assert!(page.contains("id=\"filter-menu\""));
        assert!(page.contains("#filter-menu { padding: 8px; background-color: #222222; color: white; }"));
    }

    #[test]
    fn test_filter_menu_optional() {
        let net = Network::new(NetworkOptions {
            filter_menu: false,
            ..Default::default()
        });
        let page = to_html(&net).unwrap();
        assert!(!page.contains("filter-menu"));
        assert!(!page.contains("filter-values"));
        assert!(page.contains("</style>"));
        assert!(page.contains("new vis.DataSet([])"));
    }

    #[test]
    fn test_labels_cannot_close_script() {
        let mut net = Network::new(NetworkOptions::default());
        net.add_node("</script><b>", "</script><b>", "T", "T").unwrap();
        let page = to_html(&net).unwrap();
        assert_eq!(page.matches("</script>").count(), 2);
        assert!(page.contains("<\\/script>"));
    }
}
