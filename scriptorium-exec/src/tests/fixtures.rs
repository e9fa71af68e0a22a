//! Submission samples used by the integration tests

pub mod hello {
    pub const PYTHON: &str = r#"print("Hello from Python!")"#;
    pub const JAVASCRIPT: &str = r#"console.log('Hello from JavaScript!')"#;
    pub const JAVA: &str = r#"public class Main {
    public static void main(String[] args) {
        System.out.println("Hello from Java!");
    }
}"#;
    pub const C: &str = r#"#include <stdio.h>

int main(void) {
    printf("Hello from C!\n");
    return 0;
}"#;
    pub const CPP: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello from C++!" << std::endl;
    return 0;
}"#;
}

pub mod echo {
    pub const PYTHON: &str = r#"print(input())"#;
    pub const JAVASCRIPT: &str = r#"console.log(process.argv[2]);"#;
    pub const JAVA: &str = r#"public class Echo {
    public static void main(String[] args) {
        System.out.println(args[0]);
    }
}"#;
    pub const C: &str = r#"#include <stdio.h>

int main(void) {
    char line[256];
    if (fgets(line, sizeof line, stdin)) {
        fputs(line, stdout);
    }
    return 0;
}"#;
}

pub mod broken {
    pub const C_SYNTAX_ERROR: &str = r#"int main( {
    return 0
}"#;
    pub const CPP_SYNTAX_ERROR: &str = r#"#include <iostream>

int main() {
    std::cout << "unterminated
}"#;
    pub const JAVA_NO_PUBLIC_CLASS: &str = r#"class Hidden {
    public static void main(String[] args) {}
}"#;
    pub const PYTHON_RAISES: &str = r#"raise RuntimeError("boom")"#;
}

pub mod scenarios {
    pub const PYTHON_LOOP_FOREVER: &str = "while True:\n    pass\n";
    pub const PYTHON_BIG_OUTPUT: &str = r#"print("x" * 100000)"#;
}
