/*!

This is the long-form manual for `volunteer_matching` and `vmatch`.

## How matching works

Each participant and each volunteer is reduced to three sets of tokens: the
days, the times and the languages they declared. A participant and a volunteer
score the weight of every dimension in which they share at least one token
(3 for days, 3 for times and 4 for languages by default).

Participants are then processed in the order of the input file. Each one is
given the best-scoring volunteer still available. When several volunteers reach
the same score, the one that comes first in the volunteer file is chosen. In
the default `exclusive` mode, a volunteer is given to at most one participant;
once every volunteer is taken, the remaining participants are reported as
unmatched with a score of `-1`. In the `reusable` mode, every participant is
matched against the whole pool of volunteers.

This is a greedy procedure: an earlier participant may take a volunteer that
would have scored higher with a later one. The order of the input files is
therefore part of the outcome.

A best score of `0` is still reported as a match, so that weak matches can be
reviewed by hand. Setting a `minimumScore` turns them into unmatched rows
instead.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with the header in the first row
* `xlsx` Excel workbooks, as exported by Google Forms and Microsoft Forms

### Reading the cells

Availability cells are free text. They are split on `;`, `,` and `/`, and every
piece is trimmed and lowercased:

```text
Monday, Wednesday / FRIDAY   ->  friday, monday, wednesday
```

Time pieces are read as clock times when possible and written as `HH:MM`
(`4pm`, `4 PM`, `4:00 p.m.` and `16:00` all become `16:00`). Pieces that are
not clock times, such as `afternoon`, are kept as they are. They still match
the same wording on the other side. A bare number such as `9` is read as an
hour (`09:00`), not as a day of the month.

Excel cells that hold a time of day are converted to `HH:MM`.

### Finding the columns

The days column is the first column whose header contains `day`, and the times
column the first one whose header contains `time` (case is ignored). Both
keywords can be changed. Beware of columns such as `Timestamp` that come first
in Google Forms exports: name the column explicitly with `timeColumn` in that
case.

The language, name and email columns are optional and must be named exactly.
Without a language column, languages never contribute to the score. Without a
name column, rows are named by their position (`1`, `2`, ...).

If the days or times column cannot be found, the run stops before matching and
the error lists all the headers of the file.

## Configuration

`vmatch` accepts a configuration file in JSON. All the keys are optional except
the `provider` and `filePath` of each dataset. File paths are relative to the
directory of the configuration file.

```json
{
  "outputSettings": { "outputFile": "matches.csv", "format": "csv" },
  "participants": {
    "provider": "xlsx",
    "filePath": "participants.xlsx",
    "nameColumn": "Student's Full Name",
    "dayKeyword": "day",
    "timeKeyword": "time"
  },
  "volunteers": {
    "provider": "csv",
    "filePath": "volunteers.csv",
    "nameColumn": "Volunteer Emailed",
    "languageColumn": "Do you speak another language? If so, please include it below."
  },
  "rules": {
    "dayWeight": 3,
    "timeWeight": 3,
    "languageWeight": 4,
    "assignmentMode": "exclusive",
    "minimumScore": 0
  }
}
```

Options of a dataset:
 - `provider` (`csv` or `xlsx`)
 - `filePath`
 - `excelWorksheetName` (optional): for Excel inputs, the worksheet to read.
   Defaults to the only worksheet, or the first one.
 - `dayKeyword`, `timeKeyword` (optional): the keywords searched in the headers.
 - `dayColumn`, `timeColumn` (optional): exact header names. They take
   precedence over the keywords.
 - `languageColumn`, `nameColumn`, `emailColumn` (optional): exact header names.

Options of `outputSettings`:
 - `outputFile` (optional): a path, or `stdout`.
 - `format` (optional): `csv` (default) or `json`.

## Output

One row per participant, in the order of the participants file:

|Participant|Participant Email|Volunteer|Volunteer Email|Score|Status|Shared Days|Shared Times|Shared Languages|
|-----------|-----------------|---------|---------------|-----|------|-----------|------------|----------------|
|Ada        |                 |Alan     |               |6    |matched|wednesday |16:00       |                |
|Grace      |                 |         |               |-1   |no_candidate|     |            |                |

The status is one of `matched`, `below_threshold` (the best volunteer did not
reach the minimum score) and `no_candidate` (no volunteer left).

 */
