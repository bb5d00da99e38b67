#[macro_use]
extern crate bencher;

use bencher::Bencher;
use graphql_ast::ast::*;

const QUERY: &str = r#"
query StudentsNormal {
  allStudents(pagination: {offset: 0, limit: 10}, sort: {fields: [{field: "studentNumber", order: ASC}]},
              filter: {fields: [{op: NIN, value: "[Harry]", field: "name"}]}) {
    result {
      ...studentFields
      subjects {
        name
        classroom
      }
    }
    pagination {
      offset
      limit
      total
    }
  }
}

fragment studentFields on Student @include(if: true) {
  studentNumber
  name
  surname
}
"#;

fn graphql_ast_lex(bench: &mut Bencher) {
    bench.iter(|| {
        let ctx = ASTContext::new();
        lex_to_list(&ctx, QUERY).len()
    });
}

fn graphql_ast_parse(bench: &mut Bencher) {
    bench.iter(|| {
        let ctx = ASTContext::new();
        parse(&ctx, "bench", QUERY).ok();
    });
}

fn graphql_ast_print(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let ast = parse(&ctx, "bench", QUERY).unwrap();
    bench.iter(|| pretty_print(&ast).unwrap().len());
}

fn graphql_ast_plain(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let ast = parse(&ctx, "bench", QUERY).unwrap();
    bench.iter(|| ast.plain());
}

benchmark_group!(
    benches,
    graphql_ast_lex,
    graphql_ast_parse,
    graphql_ast_print,
    graphql_ast_plain
);
benchmark_main!(benches);
