use reqvalid_schema::{SortOptions, SortViolation};

use crate::cmd::SortArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_sort, OutputFormat, SortOutput};

pub fn run(args: SortArgs, format: OutputFormat) -> CliResult<i32> {
    let options = SortOptions::new(args.allow.iter().map(String::as_str));
    let result = options
        .parse(&args.candidate)
        .map_err(SortViolation::message);

    tracing::debug!(candidate = %args.candidate, valid = result.is_ok(), "checked sort parameter");
    print_sort(&SortOutput::new(&args.candidate, &result), format);

    if result.is_ok() {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}
