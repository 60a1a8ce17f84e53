use crate::render::escape_html;
use crate::view::{SortDirection, ViewQuery};
use crate::viewer::Viewer;

pub fn render_index(viewer: &Viewer, query: &ViewQuery) -> String {
    let chart = viewer.chart().map(|chart| chart.svg.as_str()).unwrap_or_default();
    let schema = viewer
        .schema()
        .and_then(|schema| serde_json::to_string_pretty(schema).ok())
        .map(|text| escape_html(&text))
        .unwrap_or_default();
    let (asc, desc) = match query.sort {
        SortDirection::Asc => (" selected", ""),
        SortDirection::Desc => ("", " selected"),
    };

    INDEX_HTML
        .replace("{{MONTH}}", &escape_html(&query.month))
        .replace("{{SORT_ASC}}", asc)
        .replace("{{SORT_DESC}}", desc)
        .replace("{{CHART}}", chart)
        .replace("{{SCHEMA}}", &schema)
        .replace("{{ENTRIES}}", &viewer.render(query))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dog Diary</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --good: #2d7a4b;
      --warn: #b7791f;
      --bad: #c63b2b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    input, select, button, .upload {
      font: inherit;
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 10px 16px;
      background: white;
    }

    button, .upload {
      cursor: pointer;
      font-weight: 600;
      background: var(--accent-2);
      color: white;
      border: none;
    }

    .upload input {
      display: none;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    #entries {
      display: grid;
      gap: 14px;
    }

    .entry h3 {
      margin: 0 0 10px;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .pill {
      border-radius: 999px;
      padding: 4px 12px;
      font-size: 0.9rem;
      background: rgba(47, 72, 88, 0.08);
    }

    .pill.good {
      background: rgba(45, 122, 75, 0.15);
      color: var(--good);
    }

    .pill.warn {
      background: rgba(183, 121, 31, 0.15);
      color: var(--warn);
    }

    .pill.bad {
      background: rgba(198, 59, 43, 0.15);
      color: var(--bad);
    }

    .space-top {
      margin-top: 10px;
    }

    .note {
      color: #5f5c57;
      white-space: pre-wrap;
    }

    .empty {
      color: #8b857d;
      text-align: center;
      padding: 24px;
    }

    #chart-panel svg {
      width: 100%;
      height: 260px;
      display: block;
    }

    #schema {
      margin: 0;
      max-height: 320px;
      overflow: auto;
      font-size: 0.85rem;
    }

    .status {
      min-height: 1.2em;
      color: #6b645d;
    }

    .status[data-type="ok"] {
      color: var(--good);
    }

    .status[data-type="error"] {
      color: var(--bad);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Dog Diary</h1>
      <p class="subtitle">Weight, energy, meals, water, walks and meds, day by day.</p>
    </header>

    <form id="view-form" class="controls" method="get" action="/">
      <input id="filterDate" name="month" type="text" placeholder="YYYY-MM" value="{{MONTH}}" aria-label="Month filter" />
      <select id="sortSelect" name="sort" aria-label="Sort by date">
        <option value="desc"{{SORT_DESC}}>Newest first</option>
        <option value="asc"{{SORT_ASC}}>Oldest first</option>
      </select>
      <button type="submit">Apply</button>
      <button id="downloadJson" type="submit" formaction="/download">Download JSON</button>
      <label class="upload">Upload JSON<input id="uploadJson" type="file" accept="application/json,.json" /></label>
    </form>
    <div class="status" id="status"></div>

    <section class="card">
      <h2>Weight over time</h2>
      <div id="chart-panel">{{CHART}}</div>
    </section>

    <section id="entries">{{ENTRIES}}</section>

    <details class="card">
      <summary>Entry schema</summary>
      <pre id="schema">{{SCHEMA}}</pre>
    </details>
  </main>

  <script>
    const form = document.getElementById('view-form');
    const monthInput = document.getElementById('filterDate');
    const sortSel = document.getElementById('sortSelect');
    const entriesEl = document.getElementById('entries');
    const chartEl = document.getElementById('chart-panel');
    const dlBtn = document.getElementById('downloadJson');
    const upInput = document.getElementById('uploadJson');
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const viewParams = () =>
      new URLSearchParams({ month: monthInput.value, sort: sortSel.value }).toString();

    const refreshEntries = async () => {
      const params = viewParams();
      const res = await fetch(`/entries?${params}`);
      if (!res.ok) {
        throw new Error('Unable to load entries');
      }
      entriesEl.innerHTML = await res.text();
      history.replaceState(null, '', `/?${params}`);
    };

    const refreshChart = async () => {
      const res = await fetch('/chart.svg', { cache: 'no-store' });
      if (!res.ok) {
        throw new Error('Unable to load chart');
      }
      chartEl.innerHTML = await res.text();
    };

    const onViewChange = () => refreshEntries().catch((err) => setStatus(err.message, 'error'));

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      onViewChange();
    });
    monthInput.addEventListener('input', onViewChange);
    sortSel.addEventListener('change', onViewChange);

    dlBtn.addEventListener('click', (event) => {
      event.preventDefault();
      window.location.href = `/download?${viewParams()}`;
    });

    upInput.addEventListener('change', () => {
      const file = upInput.files && upInput.files[0];
      if (!file) {
        return;
      }
      const reader = new FileReader();
      reader.onload = async () => {
        const res = await fetch(`/api/import?${viewParams()}`, {
          method: 'POST',
          headers: { 'content-type': 'text/plain' },
          body: reader.result
        });
        if (!res.ok) {
          alert((await res.text()) || 'Invalid JSON');
          return;
        }
        const data = await res.json();
        entriesEl.innerHTML = data.html;
        await refreshChart();
        setStatus(`Imported ${data.imported} entries`, 'ok');
        setTimeout(() => setStatus('', ''), 1500);
      };
      reader.readAsText(file);
      upInput.value = '';
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntryStore;
    use serde_json::json;

    #[test]
    fn page_embeds_view_chart_and_escaped_schema() {
        let store = EntryStore::new(vec![
            serde_json::from_value(json!({ "date": "2025-09-01", "weight": 42.5 })).unwrap(),
        ]);
        let viewer = Viewer::new(store, Some(json!({ "title": "<entry>" })));
        let page = render_index(&viewer, &ViewQuery::new("2025-09", SortDirection::Asc));

        assert!(page.contains(r#"value="2025-09""#));
        assert!(page.contains(r#"<option value="asc" selected>"#));
        assert!(page.contains("9/1/2025"));
        assert!(page.contains("<svg"));
        assert!(page.contains("&lt;entry&gt;"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn page_without_schema_leaves_panel_empty() {
        let viewer = Viewer::new(EntryStore::default(), None);
        let page = render_index(&viewer, &ViewQuery::default());
        assert!(page.contains(r#"<pre id="schema"></pre>"#));
        assert!(page.contains("No entries for this view."));
        assert!(page.contains(r#"<option value="desc" selected>"#));
    }
}
