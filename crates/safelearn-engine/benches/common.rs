// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_lesson(sections: usize) -> String {
    let mut content = String::from("@@@ teacher, student\n\n");
    for i in 0..sections {
        content.push_str(&format!("# Section {i}\n\nIntro text for the section.\n\n"));
        content.push_str("@@@ teacher\nSolution notes only teachers see.\n@@@\n\n");
        content.push_str("Pick one ##fragment answer A\n\n##fragment\n\n");
        content.push_str("##side-by-side-start\nLeft column\n##separator\nRight column\n##side-by-side-end\n\n");
    }
    content
}
