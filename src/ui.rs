use chrono::NaiveDate;

pub fn render_index(pet_name: &str, today: NaiveDate) -> String {
    INDEX_HTML
        .replace("{{PET_NAME}}", &escape_html(pet_name))
        .replace("{{TODAY}}", &today.format("%Y-%m-%d").to_string())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{PET_NAME}}'s Diary</title>
  <style>
    :root {
      --paper: #fbf7f0;
      --ink: #33302b;
      --muted: #8a8378;
      --line: rgba(51, 48, 43, 0.1);
      --weight: #7b6fd6;
      --food: #4fae86;
      --danger: #c9483a;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, #f6efe3, var(--paper) 55%, #eef3ee);
      color: var(--ink);
      font-family: "Avenir Next", "Segoe UI", sans-serif;
      display: flex;
      justify-content: center;
      padding: 28px 16px 48px;
    }

    .diary {
      width: min(820px, 100%);
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      align-items: center;
      gap: 18px;
    }

    header h1 {
      margin: 0;
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.5rem);
    }

    .avatar-button {
      border: none;
      padding: 0;
      background: none;
      cursor: pointer;
      border-radius: 50%;
    }

    .avatar {
      width: 84px;
      height: 84px;
      border-radius: 50%;
      object-fit: cover;
      border: 3px solid white;
      box-shadow: 0 8px 20px rgba(51, 48, 43, 0.18);
      display: block;
    }

    section {
      background: var(--card);
      border-radius: 20px;
      padding: 22px;
      border: 1px solid var(--line);
    }

    section h2 {
      margin: 0 0 16px;
      font-size: 1.2rem;
    }

    .entry-form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 14px;
      align-items: end;
    }

    .field {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .field input {
      font: inherit;
      color: var(--ink);
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid var(--line);
      background: var(--paper);
    }

    button.primary {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      background: var(--ink);
      color: white;
      cursor: pointer;
    }

    .status {
      min-height: 1.2em;
      margin-top: 12px;
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .status[data-type="ok"] {
      color: var(--food);
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 18px;
    }

    .charts h3 {
      margin: 0 0 8px;
      font-size: 0.95rem;
      color: var(--muted);
    }

    .charts svg {
      width: 100%;
      height: 220px;
      display: block;
    }

    .grid-line {
      stroke: var(--line);
    }

    .axis-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .series {
      fill: none;
      stroke-width: 2.5;
    }

    .series.weight,
    .dot.weight {
      stroke: var(--weight);
    }

    .series.food,
    .dot.food {
      stroke: var(--food);
    }

    .dot {
      fill: white;
      stroke-width: 2;
    }

    .history-toggle {
      display: flex;
      align-items: center;
      gap: 8px;
      cursor: pointer;
      user-select: none;
    }

    .history-toggle .chevron {
      transition: transform 150ms ease;
    }

    .history-toggle.collapsed .chevron {
      transform: rotate(-90deg);
    }

    .history-list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .history-card {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      padding: 14px 16px;
      border-radius: 14px;
      background: var(--paper);
    }

    .history-card dl {
      margin: 0;
      display: grid;
      grid-template-columns: auto 1fr;
      gap: 2px 12px;
      font-size: 0.9rem;
    }

    .history-card dt {
      color: var(--muted);
    }

    .history-card dd {
      margin: 0;
    }

    .delete-button {
      font: inherit;
      border: 1px solid var(--danger);
      color: var(--danger);
      background: none;
      border-radius: 999px;
      padding: 6px 14px;
      cursor: pointer;
    }

    .empty {
      color: var(--muted);
      margin: 0;
    }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <main class="diary">
    <header>
      <button class="avatar-button" id="avatar-button" type="button" title="Change picture">
        <img class="avatar" id="avatar" alt="{{PET_NAME}}'s picture" />
      </button>
      <input type="file" id="avatar-input" accept="image/*" hidden />
      <h1>{{PET_NAME}}'s Diary</h1>
    </header>

    <section>
      <h2>Log a day</h2>
      <form class="entry-form" id="entry-form">
        <label class="field">Date
          <input type="date" name="date" id="date" value="{{TODAY}}" required />
        </label>
        <label class="field">Food (g)
          <input type="number" name="food" min="0" step="any" placeholder="e.g. 50" />
        </label>
        <label class="field">Treats
          <input type="number" name="treats" min="0" step="1" placeholder="e.g. 1" />
        </label>
        <label class="field">Freeze-dried
          <input type="number" name="dried" min="0" step="1" placeholder="e.g. 5" />
        </label>
        <label class="field">Weight (kg)
          <input type="number" name="weight" min="0" step="0.01" placeholder="e.g. 4.5" />
        </label>
        <button class="primary" type="submit">Save entry</button>
      </form>
      <div class="status" id="status"></div>
    </section>

    <section id="charts-section" hidden>
      <h2>Trends</h2>
      <div class="charts">
        <div>
          <h3>Weight (kg)</h3>
          <svg id="weight-chart" viewBox="0 0 400 220" role="img" aria-label="Weight chart"></svg>
        </div>
        <div>
          <h3>Food (g)</h3>
          <svg id="food-chart" viewBox="0 0 400 220" role="img" aria-label="Food chart"></svg>
        </div>
      </div>
    </section>

    <section>
      <h2 class="history-toggle" id="history-toggle">History <span class="chevron">&#9662;</span></h2>
      <div id="history-body">
        <ul class="history-list" id="history-list"></ul>
        <p class="empty" id="history-empty" hidden>No entries yet.</p>
      </div>
    </section>
  </main>

  <script>
    const form = document.getElementById('entry-form');
    const dateInput = document.getElementById('date');
    const statusEl = document.getElementById('status');
    const avatarImg = document.getElementById('avatar');
    const avatarInput = document.getElementById('avatar-input');
    const chartsSection = document.getElementById('charts-section');
    const weightChart = document.getElementById('weight-chart');
    const foodChart = document.getElementById('food-chart');
    const historyToggle = document.getElementById('history-toggle');
    const historyBody = document.getElementById('history-body');
    const historyList = document.getElementById('history-list');
    const historyEmpty = document.getElementById('history-empty');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const localToday = () => {
      const now = new Date();
      const pad = (n) => String(n).padStart(2, '0');
      return `${now.getFullYear()}-${pad(now.getMonth() + 1)}-${pad(now.getDate())}`;
    };

    const failure = async (res, fallback) => {
      const msg = await res.text();
      return new Error(msg || fallback);
    };

    const show = (value, unit) => (value === null || value === undefined ? 'N/A' : `${value} ${unit}`.trim());

    const renderHistory = (records) => {
      historyList.replaceChildren();
      historyEmpty.hidden = records.length > 0;
      records.forEach((record) => {
        const item = document.createElement('li');
        item.className = 'history-card';

        const details = document.createElement('dl');
        [
          ['Date', record.date],
          ['Food', show(record.food, 'g')],
          ['Treats', show(record.treats, '')],
          ['Freeze-dried', show(record.dried, '')],
          ['Weight', show(record.weight, 'kg')],
        ].forEach(([label, value]) => {
          const dt = document.createElement('dt');
          dt.textContent = label;
          const dd = document.createElement('dd');
          dd.textContent = value;
          details.append(dt, dd);
        });

        const remove = document.createElement('button');
        remove.type = 'button';
        remove.className = 'delete-button';
        remove.textContent = 'Delete';
        remove.addEventListener('click', () => {
          if (!window.confirm(`Delete the entry for ${record.date}?`)) {
            return;
          }
          deleteRecord(record.id).catch((err) => setStatus(err.message, 'error'));
        });

        item.append(details, remove);
        historyList.append(item);
      });
    };

    // Points without a value are skipped; the line joins the neighbours.
    const renderSeries = (svg, points, key, domain) => {
      const width = 400;
      const height = 220;
      const left = 44;
      const right = 16;
      const top = 14;
      const bottom = 30;

      const present = points
        .map((point, index) => ({ index, label: point.date, value: point[key] }))
        .filter((point) => point.value !== null && point.value !== undefined);

      if (!present.length) {
        svg.innerHTML = '<text class="axis-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const values = present.map((point) => point.value);
      let [min, max] = domain(Math.min(...values), Math.max(...values));
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const step = points.length > 1 ? (width - left - right) / (points.length - 1) : 0;
      const x = (index) => (points.length > 1 ? left + index * step : (left + width - right) / 2);
      const y = (value) => height - bottom - ((value - min) / (max - min)) * (height - top - bottom);

      let grid = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + ((max - min) * i) / ticks;
        grid += `<line class="grid-line" x1="${left}" y1="${y(value)}" x2="${width - right}" y2="${y(value)}" />`;
        grid += `<text class="axis-label" x="${left - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value * 10) / 10}</text>`;
      }

      const every = points.length > 8 ? Math.ceil(points.length / 8) : 1;
      const labels = points
        .map((point, index) => (index % every === 0
          ? `<text class="axis-label" x="${x(index)}" y="${height - 10}" text-anchor="middle">${point.date}</text>`
          : ''))
        .join('');

      const path = present
        .map((point, i) => `${i === 0 ? 'M' : 'L'} ${x(point.index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');
      const dots = present
        .map((point) => `<circle class="dot ${key}" cx="${x(point.index)}" cy="${y(point.value)}" r="3.5"><title>${point.label}: ${point.value}</title></circle>`)
        .join('');

      svg.innerHTML = `${grid}${labels}<path class="series ${key}" d="${path}" />${dots}`;
    };

    const loadHistory = async () => {
      const res = await fetch('/api/records');
      if (!res.ok) {
        throw await failure(res, 'Unable to load history');
      }
      renderHistory(await res.json());
    };

    const loadCharts = async () => {
      const res = await fetch('/api/chart');
      if (!res.ok) {
        throw await failure(res, 'Unable to load charts');
      }
      const chart = await res.json();
      chartsSection.hidden = !chart.show_charts;
      if (chart.show_charts) {
        renderSeries(weightChart, chart.points, 'weight', (lo, hi) => [lo - 0.2, hi + 0.2]);
        renderSeries(foodChart, chart.points, 'food', (lo, hi) => [Math.min(0, lo), hi]);
      }
    };

    const loadAvatar = async () => {
      const res = await fetch('/api/avatar');
      if (!res.ok) {
        throw await failure(res, 'Unable to load picture');
      }
      avatarImg.src = (await res.json()).avatar;
    };

    const refresh = () => Promise.all([loadHistory(), loadCharts()]);

    const deleteRecord = async (id) => {
      const res = await fetch(`/api/records/${id}`, { method: 'DELETE' });
      if (!res.ok) {
        throw await failure(res, 'Delete failed');
      }
      await refresh();
      setStatus('Entry deleted', 'ok');
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const payload = Object.fromEntries(new FormData(form).entries());
      setStatus('Saving...', '');
      try {
        const res = await fetch('/api/records', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(payload),
        });
        if (!res.ok) {
          throw await failure(res, 'Save failed');
        }
        form.reset();
        dateInput.value = localToday();
        await refresh();
        setStatus('Saved', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    historyToggle.addEventListener('click', () => {
      historyBody.hidden = !historyBody.hidden;
      historyToggle.classList.toggle('collapsed', historyBody.hidden);
    });

    document.getElementById('avatar-button').addEventListener('click', () => avatarInput.click());

    avatarInput.addEventListener('change', async () => {
      const file = avatarInput.files[0];
      avatarInput.value = '';
      if (!file) {
        return;
      }
      try {
        const res = await fetch('/api/avatar/upload', {
          method: 'POST',
          headers: { 'content-type': file.type || 'application/octet-stream' },
          body: file,
        });
        if (!res.ok) {
          throw await failure(res, 'Upload failed');
        }
        avatarImg.src = (await res.json()).avatar;
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    Promise.all([loadAvatar(), refresh()]).catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_name_and_date() {
        let html = render_index("Lolo", NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(html.contains("<h1>Lolo's Diary</h1>"));
        assert!(html.contains(r#"value="2024-05-06""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn escapes_pet_name() {
        let html = render_index("<b>Tom & \"Jerry\"</b>", NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(html.contains("&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"));
        assert!(!html.contains("<b>Tom"));
    }
}
