pub mod cnf;

use nom::{
    bytes::complete::tag,
    character::complete::{digit1, multispace0, multispace1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

fn parse_i32(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(tag("-")), digit1)), str::parse).parse(input)
}

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse).parse(input)
}

/// A line made up of nothing but whitespace separated integers.
fn parse_integers(input: &str) -> IResult<&str, Vec<i32>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, parse_i32),
        multispace0,
    ))
    .parse(input)
}
