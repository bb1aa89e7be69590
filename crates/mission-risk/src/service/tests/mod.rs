mod assessments;
mod common;
mod routing;
