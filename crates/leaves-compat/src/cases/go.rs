//! Scaffolding shared by the generated leaves programs.

use crate::case::LEAVES_MODULE;

const GO_HELPERS: &str = r#"
func must(err error) {
	if err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
}

func readTSV(path string) ([]float64, int, int) {
	f, err := os.Open(path)
	must(err)
	defer f.Close()

	var vals []float64
	rows, cols := 0, 0
	scanner := bufio.NewScanner(f)
	scanner.Buffer(make([]byte, 1024*1024), 64*1024*1024)
	for scanner.Scan() {
		line := strings.TrimSpace(scanner.Text())
		if line == "" {
			continue
		}
		fields := strings.Split(line, "\t")
		if cols == 0 {
			cols = len(fields)
		} else if cols != len(fields) {
			must(fmt.Errorf("%s: row %d has %d columns, expected %d", path, rows+1, len(fields), cols))
		}
		for _, field := range fields {
			v, err := strconv.ParseFloat(field, 64)
			must(err)
			vals = append(vals, v)
		}
		rows++
	}
	must(scanner.Err())
	return vals, rows, cols
}

func writeTSV(path string, vals []float64, rows, cols int) {
	f, err := os.Create(path)
	must(err)
	defer f.Close()

	w := bufio.NewWriter(f)
	for i := 0; i < rows; i++ {
		for j := 0; j < cols; j++ {
			if j > 0 {
				w.WriteString("\t")
			}
			w.WriteString(strconv.FormatFloat(vals[i*cols+j], 'g', -1, 64))
		}
		w.WriteString("\n")
	}
	must(w.Flush())
}
"#;

/// Full Go source: package header, imports, TSV helpers and `main` with `body`.
///
/// `body` must use the leaves import; the helpers use the rest.
pub(crate) fn go_program(body: &str) -> String {
    let mut src = format!(
        "package main\n\nimport (\n\t\"bufio\"\n\t\"fmt\"\n\t\"os\"\n\t\"strconv\"\n\t\"strings\"\n\n\t\"{LEAVES_MODULE}\"\n)\n"
    );
    src.push_str(GO_HELPERS);
    src.push_str("\nfunc main() {\n");
    src.push_str(body);
    src.push_str("}\n");
    src
}

/// `main` body predicting a dense test matrix with an ensemble loaded by `loader`.
pub(crate) fn predict_dense_body(
    loader: &str,
    model_file: &str,
    test_file: &str,
    output_file: &str,
) -> String {
    format!(
        r#"	model, err := leaves.{loader}("{model_file}", true)
	must(err)
	vals, rows, cols := readTSV("{test_file}")
	groups := model.NOutputGroups()
	predictions := make([]float64, rows*groups)
	must(model.PredictDense(vals, rows, cols, predictions, 0, 1))
	writeTSV("{output_file}", predictions, rows, groups)
"#
    )
}
